//! Storage traits and error types
//!
//! This module defines the trait interface for artifact stores and
//! associated error types.

use serde_json::Value;
use std::future::Future;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Trait for artifact store implementations
///
/// Every write is preceded by an `exists` check in the harvester, and
/// implementations must additionally refuse to replace a file that appeared
/// in the meantime.
pub trait ArtifactStore {
    /// Path of an edition's metadata document
    fn metadata_path(&self, edition: u64) -> PathBuf;

    /// Path of an image with the given file name
    fn image_path(&self, file_name: &str) -> PathBuf;

    /// Checks whether a file exists at `path`
    fn exists(&self, path: &Path) -> impl Future<Output = bool> + Send;

    /// Reads back a previously stored metadata document as text
    fn read_metadata(&self, path: &Path) -> impl Future<Output = StoreResult<String>> + Send;

    /// Writes a metadata document as pretty-printed JSON
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The file was created
    /// * `Ok(false)` - A file already existed at `path` and was left untouched
    fn write_metadata(
        &self,
        edition: u64,
        path: &Path,
        doc: &Value,
    ) -> impl Future<Output = StoreResult<bool>> + Send;

    /// Writes an image payload
    ///
    /// Same return convention as [`ArtifactStore::write_metadata`].
    fn write_image(
        &self,
        edition: u64,
        path: &Path,
        bytes: &[u8],
    ) -> impl Future<Output = StoreResult<bool>> + Send;

    /// Number of entries currently in the image directory
    fn count_images(&self) -> impl Future<Output = StoreResult<u64>> + Send;
}
