use crate::state::retry_classifier::RetryClassifier;

/// Stage of a harvest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Sequential sweep over the configured edition range
    Primary,
    /// Retrying editions diverted during the primary pass
    MissingQueue,
    /// Collection complete or nothing left to try
    Finished,
}

/// All mutable progress of one harvest
///
/// Owned by the harvester and never persisted: a restart begins again at
/// the first edition and relies on the on-disk existence checks to skip
/// finished work.
#[derive(Debug, Clone)]
pub struct CrawlState {
    /// Edition currently being processed in the primary pass
    cursor: u64,

    last_edition_id: u64,

    /// Editions diverted from the primary pass, in diversion order
    missing: Vec<u64>,

    /// Position in `missing` being processed during the drain
    position: usize,

    phase: Phase,

    /// Stuck-streak tracking shared by both passes
    pub classifier: RetryClassifier,
}

impl CrawlState {
    pub fn new(first_edition_id: u64, last_edition_id: u64, max_stuck_count: u32) -> Self {
        Self {
            cursor: first_edition_id,
            last_edition_id,
            missing: Vec::new(),
            position: 0,
            phase: Phase::Primary,
            classifier: RetryClassifier::new(max_stuck_count),
        }
    }

    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            tracing::debug!("Harvest phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }

    /// Moves the cursor to the next edition
    pub fn advance(&mut self) {
        self.cursor += 1;
    }

    /// True once the cursor has moved past the last edition of the range
    pub fn primary_exhausted(&self) -> bool {
        self.cursor > self.last_edition_id
    }

    /// Appends an edition to the missing queue
    pub fn divert(&mut self, edition: u64) {
        self.missing.push(edition);
    }

    pub fn missing(&self) -> &[u64] {
        &self.missing
    }

    pub fn has_missing(&self) -> bool {
        !self.missing.is_empty()
    }

    /// Edition at the current drain position
    ///
    /// The position wraps to the front of the queue once it runs past the end.
    pub fn current_missing(&mut self) -> Option<u64> {
        if self.position >= self.missing.len() {
            self.position = 0;
        }
        self.missing.get(self.position).copied()
    }

    /// Removes the edition at the current drain position
    ///
    /// Later entries shift down, so the position now refers to the next one.
    pub fn complete_current(&mut self) -> Option<u64> {
        if self.position < self.missing.len() {
            Some(self.missing.remove(self.position))
        } else {
            None
        }
    }

    /// Leaves the current edition in the queue and moves to the next position
    pub fn skip_current(&mut self) {
        self.position += 1;
        if self.position >= self.missing.len() {
            self.position = 0;
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }
}
