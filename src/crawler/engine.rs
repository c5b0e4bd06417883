//! Harvest engine - primary pass orchestration
//!
//! The harvester walks the configured edition range one edition at a time:
//! fetch (or reuse) the metadata document, then fetch the image it points
//! at, then advance. A failed edition is retried in place after a delay
//! until it has been stuck long enough to be diverted to the missing queue,
//! which is drained once the range is exhausted (see `drain.rs`).
//!
//! Exactly one request is in flight at any time, and all progress lives in
//! a single owned [`CrawlState`].

use crate::config::Config;
use crate::crawler::fetcher::WebFetch;
use crate::crawler::metadata::EditionMetadata;
use crate::crawler::scheduler::RetryScheduler;
use crate::locator::{image_file_name, AssetLocator};
use crate::output::{HarvestOutcome, HarvestReport};
use crate::state::{CrawlState, Phase, RetryDecision};
use crate::store::ArtifactStore;
use crate::HarvestError;
use std::path::Path;

/// Main harvester structure
pub struct Harvester<F, S> {
    pub(super) fetcher: F,
    pub(super) store: S,
    pub(super) locator: AssetLocator,
    pub(super) collection: String,
    pub(super) collection_size: u64,
    pub(super) scheduler: RetryScheduler,
    pub(super) state: CrawlState,
    pub(super) report: HarvestReport,
}

impl<F: WebFetch, S: ArtifactStore> Harvester<F, S> {
    /// Creates a harvester for the collection described by `config`
    pub fn new(config: &Config, fetcher: F, store: S) -> Self {
        let collection = &config.collection;
        Self {
            fetcher,
            store,
            locator: AssetLocator::new(
                &collection.sample_metadata_url,
                &config.fetcher.gateway_base,
            ),
            collection: collection.name.clone(),
            collection_size: collection.size,
            scheduler: RetryScheduler::from_config(&config.retry),
            state: CrawlState::new(
                collection.first_edition_id,
                collection.last_edition_id,
                config.retry.max_stuck_count,
            ),
            report: HarvestReport::new(&collection.name, collection.size),
        }
    }

    pub fn state(&self) -> &CrawlState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Runs the harvest until the collection is complete or nothing is left to try
    ///
    /// Individual failures never end the harvest; they are retried or
    /// diverted. The returned report says whether the collection ended up
    /// complete.
    pub async fn run(&mut self) -> HarvestReport {
        tracing::info!("Fetching files...");

        let mut complete = self.primary_pass().await;

        if !complete && self.state.has_missing() {
            tracing::info!("Fetching missing files...");
            complete = self.drain_missing().await;
        }

        if !complete {
            complete = self.collection_complete().await;
        }

        self.state.set_phase(Phase::Finished);

        let outcome = if complete {
            tracing::info!("Collection completely fetched!");
            HarvestOutcome::Complete
        } else {
            tracing::warn!(
                "Harvest of {} stopped with {} of {} images on disk",
                self.collection,
                self.report.images_on_disk,
                self.collection_size
            );
            HarvestOutcome::Incomplete
        };

        self.report.finish(outcome, self.state.missing());
        self.report.clone()
    }

    /// Walks the cursor over the primary range
    ///
    /// Returns true if the collection became complete during the pass.
    pub async fn primary_pass(&mut self) -> bool {
        self.state.set_phase(Phase::Primary);

        while !self.state.primary_exhausted() {
            let edition = self.state.cursor();

            match self.process_edition(edition).await {
                Ok(()) => {
                    self.state.advance();
                    if self.collection_complete().await {
                        return true;
                    }
                }
                Err(e) => {
                    if self.handle_failure(edition, &e).await == RetryDecision::Divert {
                        tracing::info!(
                            "Edition {} is taking too much time to load at IPFS, the rest of the collection will be fetched first and missing editions retried later",
                            edition
                        );
                        self.state.divert(edition);
                        self.report.diverted.push(edition);
                        self.state.advance();
                    }
                }
            }
        }

        tracing::debug!(
            "Primary pass finished, {} editions in the missing queue",
            self.state.missing().len()
        );
        false
    }

    /// Fetches and stores everything belonging to one edition
    ///
    /// Metadata already on disk is read back instead of fetched, so the
    /// image step still runs for editions whose image is missing.
    pub async fn process_edition(&mut self, edition: u64) -> Result<(), HarvestError> {
        let metadata_path = self.store.metadata_path(edition);

        let metadata = if self.store.exists(&metadata_path).await {
            match self.load_stored_metadata(edition, &metadata_path).await {
                Ok(metadata) => {
                    self.report.metadata_reused += 1;
                    metadata
                }
                Err(e) => {
                    tracing::warn!(
                        "Stored metadata for edition {} is unusable ({}), fetching it again",
                        edition,
                        e
                    );
                    self.fetch_metadata(edition).await?
                }
            }
        } else {
            let metadata = self.fetch_metadata(edition).await?;
            if self
                .store
                .write_metadata(edition, &metadata_path, metadata.document())
                .await?
            {
                self.report.metadata_written += 1;
            }
            metadata
        };

        self.fetch_image(&metadata).await
    }

    async fn load_stored_metadata(
        &self,
        edition: u64,
        path: &Path,
    ) -> Result<EditionMetadata, HarvestError> {
        let text = self.store.read_metadata(path).await?;
        EditionMetadata::parse(edition, &text)
    }

    async fn fetch_metadata(&self, edition: u64) -> Result<EditionMetadata, HarvestError> {
        let url = self.locator.metadata_url(edition);
        tracing::debug!("Fetching metadata for edition {} from {}", edition, url);

        let text = self.fetcher.fetch_text(&url).await?;
        EditionMetadata::parse(edition, &text)
    }

    /// Fetches and stores the image a metadata document points at
    ///
    /// The image file is keyed by the metadata's `name`, falling back to the
    /// edition number when the document has none.
    async fn fetch_image(&mut self, metadata: &EditionMetadata) -> Result<(), HarvestError> {
        let edition = metadata.edition();

        let Some(image_locator) = metadata.image() else {
            tracing::debug!("Edition {} has no image locator", edition);
            return Ok(());
        };

        let name = metadata.name().unwrap_or_else(|| {
            tracing::warn!(
                "Edition {} metadata has no name, keying its image by edition number",
                edition
            );
            edition.to_string()
        });

        let image_path = self
            .store
            .image_path(&image_file_name(&name, image_locator));
        if self.store.exists(&image_path).await {
            self.report.images_skipped += 1;
            return Ok(());
        }

        let url = self
            .locator
            .image_url(edition, image_locator)
            .ok_or_else(|| HarvestError::InvalidLocator {
                edition,
                locator: image_locator.to_string(),
            })?;
        tracing::debug!("Fetching image for edition {} from {}", edition, url);

        let bytes = self.fetcher.fetch_bytes(&url).await?;
        if self.store.write_image(edition, &image_path, &bytes).await? {
            self.report.images_written += 1;
        }

        Ok(())
    }

    /// Records a failed attempt, classifies it, and waits out the retry delay
    pub(super) async fn handle_failure(
        &mut self,
        edition: u64,
        error: &HarvestError,
    ) -> RetryDecision {
        self.report.failed_attempts += 1;

        let decision = self.state.classifier.classify(edition);
        let streak = self.state.classifier.stuck_count();

        if error.is_transient() {
            tracing::warn!(
                "Edition {} failed (streak {}): {}",
                edition,
                streak,
                error
            );
        } else {
            tracing::error!(
                "Edition {} failed (streak {}): {}",
                edition,
                streak,
                error
            );
        }

        self.scheduler.wait(streak).await;
        decision
    }

    /// Whether the image directory holds exactly the collection size
    pub(super) async fn collection_complete(&mut self) -> bool {
        match self.store.count_images().await {
            Ok(count) => {
                self.report.images_on_disk = count;
                count == self.collection_size
            }
            Err(e) => {
                tracing::warn!("Could not count images: {}", e);
                false
            }
        }
    }
}
