//! Integration tests for the harvester
//!
//! These tests use wiremock to stand in for a content-addressed gateway and
//! run the full harvest cycle end-to-end against a temporary directory.

use edition_harvester::config::{parse_config, Config};
use edition_harvester::crawler::harvest;
use edition_harvester::HarvestOutcome;
use serde_json::json;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock gateway
fn create_test_config(sample_url: &str, gateway: &str, last: u64, size: u64, root: &Path) -> Config {
    parse_config(&format!(
        r#"
[collection]
name = "test-collection"
sample-metadata-url = "{sample_url}"
first-edition-id = 1
last-edition-id = {last}
size = {size}

[fetcher]
page-timeout = 5000
gateway-base = "{gateway}"

[retry]
delay = 0

[output]
root = "{root}"
"#,
        root = root.display()
    ))
    .expect("Failed to build test config")
}

/// Mounts metadata and image responses for the given editions
async fn mount_editions(server: &MockServer, editions: std::ops::RangeInclusive<u64>) {
    for edition in editions {
        Mock::given(method("GET"))
            .and(path(format!("/ipfs/QmMeta/{}.json", edition)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": format!("Token #{}", edition),
                "description": "test token",
                "image": format!("ipfs://QmImages/{}.png", edition),
            })))
            .mount(server)
            .await;

        Mock::given(method("GET"))
            .and(path(format!("/ipfs/QmImages/{}.png", edition)))
            .respond_with(
                ResponseTemplate::new(200).set_body_bytes(format!("png-{}", edition).into_bytes()),
            )
            .mount(server)
            .await;
    }
}

fn count_files(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| entries.count())
        .unwrap_or(0)
}

#[tokio::test]
async fn test_full_harvest_small_collection() {
    let server = MockServer::start().await;
    mount_editions(&server, 1..=3).await;

    let root = TempDir::new().unwrap();
    let config = create_test_config(
        &format!("{}/ipfs/QmMeta/0.json", server.uri()),
        &format!("{}/ipfs", server.uri()),
        3,
        3,
        root.path(),
    );

    let report = harvest(&config).await.expect("Harvest failed to start");

    assert_eq!(report.outcome, HarvestOutcome::Complete);
    assert_eq!(report.images_on_disk, 3);

    let base = root.path().join("test-collection");
    assert_eq!(count_files(&base.join("metadata")), 3);
    assert_eq!(count_files(&base.join("images")), 3);

    // Images are keyed by the metadata name, metadata by edition number
    let image = std::fs::read(base.join("images/Token #2.png")).unwrap();
    assert_eq!(image, b"png-2");

    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(base.join("metadata/2.json")).unwrap())
            .unwrap();
    assert_eq!(stored["name"], "Token #2");
    assert_eq!(stored["description"], "test token");
}

#[tokio::test]
async fn test_second_harvest_makes_no_requests() {
    let server = MockServer::start().await;
    mount_editions(&server, 1..=3).await;

    let root = TempDir::new().unwrap();
    let config = create_test_config(
        &format!("{}/ipfs/QmMeta/0.json", server.uri()),
        &format!("{}/ipfs", server.uri()),
        3,
        3,
        root.path(),
    );

    harvest(&config).await.unwrap();
    let after_first = server.received_requests().await.unwrap().len();
    assert_eq!(after_first, 6);

    let report = harvest(&config).await.unwrap();
    assert_eq!(report.outcome, HarvestOutcome::Complete);
    assert_eq!(report.metadata_written, 0);
    assert_eq!(report.images_written, 0);
    assert_eq!(server.received_requests().await.unwrap().len(), after_first);
}

#[tokio::test]
async fn test_persistently_failing_edition_is_diverted_then_recovered() {
    let server = MockServer::start().await;

    // Edition 2 fails 50 consecutive times before the gateway serves it
    Mock::given(method("GET"))
        .and(path("/ipfs/QmMeta/2.json"))
        .respond_with(ResponseTemplate::new(504))
        .up_to_n_times(50)
        .expect(50)
        .mount(&server)
        .await;
    mount_editions(&server, 1..=3).await;

    let root = TempDir::new().unwrap();
    let config = create_test_config(
        &format!("{}/ipfs/QmMeta/0.json", server.uri()),
        &format!("{}/ipfs", server.uri()),
        3,
        3,
        root.path(),
    );

    let report = harvest(&config).await.unwrap();

    assert_eq!(report.outcome, HarvestOutcome::Complete);
    assert_eq!(report.failed_attempts, 50);
    assert_eq!(report.diverted, vec![2]);
    assert_eq!(report.recovered, vec![2]);
    assert!(report.still_missing.is_empty());

    let images = root.path().join("test-collection/images");
    assert_eq!(count_files(&images), 3);
    assert_eq!(std::fs::read(images.join("Token #2.png")).unwrap(), b"png-2");
}

#[tokio::test]
async fn test_metadata_without_json_suffix() {
    let server = MockServer::start().await;
    for edition in 1..=2u64 {
        Mock::given(method("GET"))
            .and(path(format!("/tokens/{}", edition)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": edition.to_string(),
                "image": format!("ipfs://QmArt/original-{}.jpg", edition),
            })))
            .mount(&server)
            .await;

        // The image is addressed by edition number, not by its original file name
        Mock::given(method("GET"))
            .and(path(format!("/ipfs/QmArt/{}.jpg", edition)))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![edition as u8]))
            .mount(&server)
            .await;
    }

    let root = TempDir::new().unwrap();
    let config = create_test_config(
        &format!("{}/tokens/meta", server.uri()),
        &format!("{}/ipfs", server.uri()),
        2,
        2,
        root.path(),
    );

    let report = harvest(&config).await.unwrap();

    assert_eq!(report.outcome, HarvestOutcome::Complete);
    let base = root.path().join("test-collection");
    assert!(base.join("metadata/1.json").exists());
    assert_eq!(std::fs::read(base.join("images/2.jpg")).unwrap(), vec![2]);
}

#[tokio::test]
async fn test_image_locator_without_file_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ipfs/QmMeta/1.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "solo",
            "image": "ipfs://QmWholeImage",
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ipfs/QmWholeImage"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"raw".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let root = TempDir::new().unwrap();
    let config = create_test_config(
        &format!("{}/ipfs/QmMeta/1.json", server.uri()),
        &format!("{}/ipfs", server.uri()),
        1,
        1,
        root.path(),
    );

    let report = harvest(&config).await.unwrap();

    assert_eq!(report.outcome, HarvestOutcome::Complete);
    let image = root.path().join("test-collection/images/solo");
    assert_eq!(std::fs::read(image).unwrap(), b"raw");
}
