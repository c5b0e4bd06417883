//! Output module for harvest reports
//!
//! This module handles:
//! - The report a harvest returns when it stops
//! - Inspecting an existing collection folder without fetching anything

mod report;
pub mod status;

pub use report::{print_report, HarvestOutcome, HarvestReport};
pub use status::{collect_status, print_status, CollectionStatus};
