//! Crawler module for edition fetching and processing
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching of metadata documents and images
//! - The primary pass over the edition range
//! - Draining the missing queue
//! - Retry scheduling

mod drain;
mod engine;
mod fetcher;
mod metadata;
mod scheduler;

pub use engine::Harvester;
pub use fetcher::{build_http_client, FetchError, HttpFetcher, WebFetch};
pub use metadata::EditionMetadata;
pub use scheduler::{BackoffStrategy, RetryScheduler};

use crate::config::Config;
use crate::output::HarvestReport;
use crate::store::FsStore;
use crate::HarvestError;

/// Runs a complete harvest against the filesystem
///
/// This is the main entry point for starting a harvest. It will:
/// 1. Create the collection folder layout if needed
/// 2. Build the HTTP client
/// 3. Walk the edition range, then drain the missing queue
///
/// # Arguments
///
/// * `config` - The harvester configuration
///
/// # Returns
///
/// * `Ok(HarvestReport)` - The harvest ran to its end (complete or not)
/// * `Err(HarvestError)` - The harvest could not be started
///
/// # Example
///
/// ```no_run
/// use edition_harvester::config::load_config;
/// use edition_harvester::crawler::harvest;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("harvest.toml"))?;
/// let report = harvest(&config).await?;
/// println!("complete: {}", report.is_complete());
/// # Ok(())
/// # }
/// ```
pub async fn harvest(config: &Config) -> Result<HarvestReport, HarvestError> {
    let store = FsStore::from_config(config);
    store.prepare().await?;

    let fetcher = HttpFetcher::new(&config.fetcher)?;

    let mut harvester = Harvester::new(config, fetcher, store);
    Ok(harvester.run().await)
}
