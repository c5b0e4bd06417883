//! Edition-Harvester: a resumable collection fetcher
//!
//! This crate incrementally materializes a numbered collection of assets
//! (a JSON metadata document plus one image per edition) from a
//! content-addressed gateway onto the local filesystem. Every write is
//! gated by an existence check, so an interrupted harvest can simply be
//! started again.

pub mod config;
pub mod crawler;
pub mod locator;
pub mod output;
pub mod state;
pub mod store;

use crate::crawler::FetchError;
use thiserror::Error;

/// Main error type for Edition-Harvester operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Malformed metadata for edition {edition}: {source}")]
    MetadataParse {
        edition: u64,
        source: serde_json::Error,
    },

    #[error("Edition {edition} has an image locator without a content identifier: {locator}")]
    InvalidLocator { edition: u64, locator: String },

    #[error("Storage error: {0}")]
    Store(#[from] store::StoreError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

impl HarvestError {
    /// Returns true for failures caused by the upstream gateway rather than
    /// by the document or the local disk
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Fetch(_) | Self::Client(_))
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Edition-Harvester operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Harvester, HttpFetcher, WebFetch};
pub use locator::AssetLocator;
pub use output::{HarvestOutcome, HarvestReport};
pub use state::{CrawlState, RetryClassifier, RetryDecision};
pub use store::{ArtifactStore, FsStore};

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_only_fetch_failures_are_transient() {
        let fetch = HarvestError::from(FetchError::Timeout {
            url: "http://gw.test/1.json".to_string(),
        });
        assert!(fetch.is_transient());

        let parse = HarvestError::MetadataParse {
            edition: 1,
            source: serde_json::from_str::<serde_json::Value>("<html>").unwrap_err(),
        };
        assert!(!parse.is_transient());

        let store = HarvestError::from(store::StoreError::Io {
            path: PathBuf::from("images/1.png"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        });
        assert!(!store.is_transient());
        assert!(store.to_string().contains("images/1.png"));
    }
}
