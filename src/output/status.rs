//! Offline inspection of a collection folder
//!
//! Counts what a previous harvest left on disk without touching the network.

use crate::config::Config;
use crate::store::{ArtifactStore, FsStore, StoreResult};

/// Snapshot of a collection folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionStatus {
    pub collection: String,
    pub metadata_files: u64,
    pub image_files: u64,
    pub collection_size: u64,
    /// Editions of the primary range without a metadata document
    pub missing_metadata: Vec<u64>,
}

impl CollectionStatus {
    pub fn is_complete(&self) -> bool {
        self.image_files == self.collection_size
    }
}

/// Scans the collection folder described by `config`
pub async fn collect_status(config: &Config, store: &FsStore) -> StoreResult<CollectionStatus> {
    let metadata_files = store.count_metadata().await?;
    let image_files = store.count_images().await?;

    let mut missing_metadata = Vec::new();
    for edition in config.collection.first_edition_id..=config.collection.last_edition_id {
        if !store.exists(&store.metadata_path(edition)).await {
            missing_metadata.push(edition);
        }
    }

    Ok(CollectionStatus {
        collection: config.collection.name.clone(),
        metadata_files,
        image_files,
        collection_size: config.collection.size,
        missing_metadata,
    })
}

/// Prints a status snapshot to stdout
pub fn print_status(status: &CollectionStatus) {
    println!("=== Collection Status: {} ===\n", status.collection);
    println!("  Metadata files: {}", status.metadata_files);
    println!(
        "  Image files: {} / {}",
        status.image_files, status.collection_size
    );

    if status.missing_metadata.is_empty() {
        println!("  Missing metadata: none");
    } else {
        const SHOWN: usize = 20;
        let shown: Vec<String> = status
            .missing_metadata
            .iter()
            .take(SHOWN)
            .map(|edition| edition.to_string())
            .collect();
        let more = status.missing_metadata.len().saturating_sub(SHOWN);
        print!(
            "  Missing metadata ({}): {}",
            status.missing_metadata.len(),
            shown.join(", ")
        );
        if more > 0 {
            print!(" ... and {} more", more);
        }
        println!();
    }

    println!();
    if status.is_complete() {
        println!("✓ Collection is complete");
    } else {
        println!("✗ Collection is incomplete");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use serde_json::json;
    use tempfile::TempDir;

    fn test_config(root: &str) -> Config {
        parse_config(&format!(
            r#"
[collection]
name = "cats"
sample-metadata-url = "https://ipfs.io/ipfs/QmMeta/1.json"
first-edition-id = 1
last-edition-id = 4
size = 4

[output]
root = "{}"
"#,
            root
        ))
        .unwrap()
    }

    #[tokio::test]
    async fn test_collect_status() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path().to_str().unwrap());
        let store = FsStore::from_config(&config);
        store.prepare().await.unwrap();

        for edition in [1, 3] {
            let path = store.metadata_path(edition);
            store
                .write_metadata(edition, &path, &json!({"name": edition}))
                .await
                .unwrap();
        }
        let image = store.image_path("1.png");
        store.write_image(1, &image, b"png").await.unwrap();

        let status = collect_status(&config, &store).await.unwrap();
        assert_eq!(status.metadata_files, 2);
        assert_eq!(status.image_files, 1);
        assert_eq!(status.missing_metadata, vec![2, 4]);
        assert!(!status.is_complete());
    }
}
