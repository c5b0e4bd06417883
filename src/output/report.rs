use chrono::{DateTime, Utc};

/// How a harvest ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarvestOutcome {
    /// The image directory holds exactly the configured collection size
    Complete,
    /// Every edition was tried but the collection is not complete
    Incomplete,
}

/// Summary of one harvest
#[derive(Debug, Clone)]
pub struct HarvestReport {
    pub collection: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Metadata documents created during this run
    pub metadata_written: u64,
    /// Metadata documents found on disk and read back instead of fetched
    pub metadata_reused: u64,
    /// Images created during this run
    pub images_written: u64,
    /// Images skipped because they already existed
    pub images_skipped: u64,

    /// Failed attempts across both passes
    pub failed_attempts: u64,
    /// Editions diverted to the missing queue, in diversion order
    pub diverted: Vec<u64>,
    /// Diverted editions later completed by the missing-queue drain
    pub recovered: Vec<u64>,
    /// Editions still in the missing queue when the harvest stopped
    pub still_missing: Vec<u64>,

    /// Image count at the last completion check
    pub images_on_disk: u64,
    pub collection_size: u64,

    pub outcome: HarvestOutcome,
}

impl HarvestReport {
    pub fn new(collection: &str, collection_size: u64) -> Self {
        Self {
            collection: collection.to_string(),
            started_at: Utc::now(),
            finished_at: None,
            metadata_written: 0,
            metadata_reused: 0,
            images_written: 0,
            images_skipped: 0,
            failed_attempts: 0,
            diverted: Vec::new(),
            recovered: Vec::new(),
            still_missing: Vec::new(),
            images_on_disk: 0,
            collection_size,
            outcome: HarvestOutcome::Incomplete,
        }
    }

    /// Stamps the finish time and final outcome
    pub fn finish(&mut self, outcome: HarvestOutcome, still_missing: &[u64]) {
        self.finished_at = Some(Utc::now());
        self.outcome = outcome;
        self.still_missing = still_missing.to_vec();
    }

    pub fn is_complete(&self) -> bool {
        self.outcome == HarvestOutcome::Complete
    }

    /// Wall-clock duration in seconds, once finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }
}

/// Prints a report to stdout in a formatted manner
pub fn print_report(report: &HarvestReport) {
    println!("=== Harvest Report: {} ===\n", report.collection);

    println!("Started:  {}", report.started_at.to_rfc3339());
    if let Some(finished) = report.finished_at {
        println!("Finished: {}", finished.to_rfc3339());
    }
    if let Some(seconds) = report.duration_seconds() {
        println!("Duration: {}s", seconds);
    }
    println!();

    println!("Artifacts:");
    println!("  Metadata written: {}", report.metadata_written);
    println!("  Metadata reused from disk: {}", report.metadata_reused);
    println!("  Images written: {}", report.images_written);
    println!("  Images already present: {}", report.images_skipped);
    println!();

    println!("Failures:");
    println!("  Failed attempts: {}", report.failed_attempts);
    println!("  Diverted editions: {}", format_editions(&report.diverted));
    println!("  Recovered editions: {}", format_editions(&report.recovered));
    if !report.still_missing.is_empty() {
        println!(
            "  Still missing: {}",
            format_editions(&report.still_missing)
        );
    }
    println!();

    let percentage = if report.collection_size > 0 {
        (report.images_on_disk as f64 / report.collection_size as f64) * 100.0
    } else {
        0.0
    };
    println!(
        "Images on disk: {} / {} ({:.1}%) - {:?}",
        report.images_on_disk, report.collection_size, percentage, report.outcome
    );
}

fn format_editions(editions: &[u64]) -> String {
    if editions.is_empty() {
        return "none".to_string();
    }
    editions
        .iter()
        .map(|edition| format!("#{}", edition))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_report_is_incomplete_and_unfinished() {
        let report = HarvestReport::new("cats", 10);
        assert_eq!(report.outcome, HarvestOutcome::Incomplete);
        assert!(report.finished_at.is_none());
        assert!(report.duration_seconds().is_none());
    }

    #[test]
    fn test_finish() {
        let mut report = HarvestReport::new("cats", 10);
        report.finish(HarvestOutcome::Complete, &[]);

        assert!(report.is_complete());
        assert!(report.duration_seconds().unwrap() >= 0);
        assert!(report.still_missing.is_empty());
    }

    #[test]
    fn test_format_editions() {
        assert_eq!(format_editions(&[]), "none");
        assert_eq!(format_editions(&[2, 17]), "#2, #17");
    }
}
