//! Storage module for harvested artifacts
//!
//! This module persists metadata documents and images on the local
//! filesystem under `{root}/{collection}/metadata/{edition}.json` and
//! `{root}/{collection}/images/{name}.{ext}`. Files are only ever created,
//! never overwritten, which makes a harvest safe to run again over the same
//! directory.

mod fs;
mod traits;

pub use fs::FsStore;
pub use traits::{ArtifactStore, StoreError, StoreResult};

/// Directory holding metadata documents, relative to the collection folder
pub const METADATA_DIR: &str = "metadata";

/// Directory holding images, relative to the collection folder
pub const IMAGES_DIR: &str = "images";
