//! Missing-queue drain - secondary pass
//!
//! Editions diverted during the primary pass are retried here, indexed by
//! their position in the queue. A completed edition is removed from the
//! queue; an edition that gets stuck again stays queued and the drain moves
//! on to the next position, wrapping around to the front.

use crate::crawler::engine::Harvester;
use crate::crawler::fetcher::WebFetch;
use crate::state::{Phase, RetryDecision};
use crate::store::ArtifactStore;

impl<F: WebFetch, S: ArtifactStore> Harvester<F, S> {
    /// Retries diverted editions until the queue is empty or the collection is complete
    ///
    /// Returns true if the collection became complete.
    pub async fn drain_missing(&mut self) -> bool {
        self.state.set_phase(Phase::MissingQueue);
        self.state.classifier.reset();

        while let Some(edition) = self.state.current_missing() {
            tracing::debug!(
                "Retrying missing edition {} ({} queued)",
                edition,
                self.state.missing().len()
            );

            match self.process_edition(edition).await {
                Ok(()) => {
                    self.state.complete_current();
                    self.report.recovered.push(edition);
                    tracing::info!(
                        "Missing edition {} fetched, {} left",
                        edition,
                        self.state.missing().len()
                    );

                    if self.collection_complete().await {
                        return true;
                    }
                }
                Err(e) => {
                    if self.handle_failure(edition, &e).await == RetryDecision::Divert {
                        tracing::info!(
                            "Missing edition {} is still taking too much time to load, moving on to the next one",
                            edition
                        );
                        self.state.skip_current();
                    }
                }
            }
        }

        false
    }
}
