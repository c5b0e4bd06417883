//! State module for tracking harvest progress
//!
//! # Components
//!
//! - `CrawlState`: the cursor over the primary range and the missing queue
//! - `RetryClassifier`: decides between retrying an edition in place and
//!   diverting it to the missing queue

mod crawl_state;
mod retry_classifier;

// Re-export main types
pub use crawl_state::{CrawlState, Phase};
pub use retry_classifier::{RetryClassifier, RetryDecision, DEFAULT_MAX_STUCK_COUNT};
