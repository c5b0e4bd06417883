//! Stuck-streak tracking for failed fetch attempts
//!
//! A failure that keeps recurring at the same position is considered
//! effectively permanent for now, and the edition is diverted so the rest of
//! the collection can make progress.

/// Consecutive failures at one position before diverting
pub const DEFAULT_MAX_STUCK_COUNT: u32 = 50;

/// What to do after a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Try the same edition again after the retry delay
    Retry,
    /// Give up on the edition for now and move it to the missing queue
    Divert,
}

/// Tracks consecutive failures pinned to the same position
#[derive(Debug, Clone)]
pub struct RetryClassifier {
    /// Position of the most recent failure
    stuck_cursor: Option<u64>,

    /// Consecutive failures observed at `stuck_cursor`
    stuck_count: u32,

    max_stuck_count: u32,
}

impl RetryClassifier {
    pub fn new(max_stuck_count: u32) -> Self {
        Self {
            stuck_cursor: None,
            stuck_count: 0,
            max_stuck_count: max_stuck_count.max(1),
        }
    }

    /// Records a failure at `cursor` and classifies it
    ///
    /// A failure at a different position than the previous one starts a new
    /// streak of length one. Once a streak reaches the threshold the position
    /// is diverted and tracking starts over.
    pub fn classify(&mut self, cursor: u64) -> RetryDecision {
        if self.stuck_cursor == Some(cursor) {
            self.stuck_count += 1;
        } else {
            self.stuck_cursor = Some(cursor);
            self.stuck_count = 1;
        }

        if self.stuck_count >= self.max_stuck_count {
            self.reset();
            RetryDecision::Divert
        } else {
            RetryDecision::Retry
        }
    }

    /// Forgets the current streak
    pub fn reset(&mut self) {
        self.stuck_cursor = None;
        self.stuck_count = 0;
    }

    pub fn stuck_cursor(&self) -> Option<u64> {
        self.stuck_cursor
    }

    /// Length of the current streak
    pub fn stuck_count(&self) -> u32 {
        self.stuck_count
    }

    pub fn max_stuck_count(&self) -> u32 {
        self.max_stuck_count
    }
}

impl Default for RetryClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_STUCK_COUNT)
    }
}
