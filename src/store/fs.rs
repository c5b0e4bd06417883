//! Local filesystem artifact store
//!
//! All I/O goes through `tokio::fs`. Files are opened with `create_new`, so a
//! file that exists on disk is never replaced even if it appeared after the
//! harvester's existence check.

use crate::config::Config;
use crate::store::traits::{ArtifactStore, StoreError, StoreResult};
use crate::store::{IMAGES_DIR, METADATA_DIR};
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

/// Filesystem store rooted at `{root}/{collection}`
#[derive(Debug, Clone)]
pub struct FsStore {
    collection: String,
    metadata_dir: PathBuf,
    images_dir: PathBuf,
}

impl FsStore {
    /// Creates a store for `collection` under `root`
    ///
    /// Nothing is touched on disk until [`FsStore::prepare`] or a write.
    pub fn new(root: impl AsRef<Path>, collection: &str) -> Self {
        let base = root.as_ref().join(collection);
        Self {
            collection: collection.to_string(),
            metadata_dir: base.join(METADATA_DIR),
            images_dir: base.join(IMAGES_DIR),
        }
    }

    /// Creates a store from the output and collection sections of a config
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.output.root, &config.collection.name)
    }

    /// Creates the metadata and image directories if they are missing
    pub async fn prepare(&self) -> StoreResult<()> {
        for dir in [&self.metadata_dir, &self.images_dir] {
            fs::create_dir_all(dir)
                .await
                .map_err(|e| StoreError::io(dir, e))?;
        }
        tracing::debug!(
            "Prepared layout for {} at {}",
            self.collection,
            self.metadata_dir
                .parent()
                .unwrap_or(self.metadata_dir.as_path())
                .display()
        );
        Ok(())
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn metadata_dir(&self) -> &Path {
        &self.metadata_dir
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    /// Number of entries currently in the metadata directory
    pub async fn count_metadata(&self) -> StoreResult<u64> {
        count_entries(&self.metadata_dir).await
    }

    /// Creates `path` and writes `bytes` to it, refusing to replace an existing file
    ///
    /// A partially written file is removed so that a later attempt starts clean.
    async fn create_and_write(path: &Path, bytes: &[u8]) -> StoreResult<bool> {
        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                tracing::debug!("{} already exists, leaving it untouched", path.display());
                return Ok(false);
            }
            Err(e) => return Err(StoreError::io(path, e)),
        };

        let written = match file.write_all(bytes).await {
            Ok(()) => file.flush().await,
            Err(e) => Err(e),
        };

        if let Err(e) = written {
            drop(file);
            if let Err(cleanup) = fs::remove_file(path).await {
                tracing::warn!(
                    "Failed to remove partial file {}: {}",
                    path.display(),
                    cleanup
                );
            }
            return Err(StoreError::io(path, e));
        }

        Ok(true)
    }
}

impl ArtifactStore for FsStore {
    fn metadata_path(&self, edition: u64) -> PathBuf {
        self.metadata_dir
            .join(crate::locator::metadata_file_name(edition))
    }

    fn image_path(&self, file_name: &str) -> PathBuf {
        self.images_dir.join(file_name)
    }

    async fn exists(&self, path: &Path) -> bool {
        fs::try_exists(path).await.unwrap_or(false)
    }

    async fn read_metadata(&self, path: &Path) -> StoreResult<String> {
        fs::read_to_string(path)
            .await
            .map_err(|e| StoreError::io(path, e))
    }

    async fn write_metadata(&self, edition: u64, path: &Path, doc: &Value) -> StoreResult<bool> {
        let body = serde_json::to_string_pretty(doc)?;
        let created = Self::create_and_write(path, body.as_bytes()).await?;
        if created {
            tracing::info!(
                "{} #{} metadata saved to {}",
                self.collection,
                edition,
                path.display()
            );
        }
        Ok(created)
    }

    async fn write_image(&self, edition: u64, path: &Path, bytes: &[u8]) -> StoreResult<bool> {
        let created = Self::create_and_write(path, bytes).await?;
        if created {
            tracing::info!(
                "{} #{} image saved to {}",
                self.collection,
                edition,
                path.display()
            );
        }
        Ok(created)
    }

    async fn count_images(&self) -> StoreResult<u64> {
        count_entries(&self.images_dir).await
    }
}

async fn count_entries(dir: &Path) -> StoreResult<u64> {
    let mut entries = fs::read_dir(dir)
        .await
        .map_err(|e| StoreError::io(dir, e))?;

    let mut count = 0;
    while entries
        .next_entry()
        .await
        .map_err(|e| StoreError::io(dir, e))?
        .is_some()
    {
        count += 1;
    }
    Ok(count)
}
