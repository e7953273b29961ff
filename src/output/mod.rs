//! Output module for per-domain artifacts and the aggregated report
//!
//! This module handles:
//! - Naming, rendering and writing the per-domain trace artifacts
//! - Serializing unit outcomes into the CSV report
//! - Console lines and end-of-run statistics

pub mod artifact;
mod console;
mod report;
pub mod stats;

pub use artifact::{artifact_file_name, render_artifact, write_artifact};
pub use console::{outcome_line, print_outcome};
pub use report::{format_row, report_file_name, ReportAggregator, REPORT_HEADER};
pub use stats::{print_summary, RunSummary};

use chrono::{DateTime, Local};

/// Timestamp format used in artifact and report file names
pub(crate) const FILE_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

pub(crate) fn file_stamp(at: &DateTime<Local>) -> String {
    at.format(FILE_STAMP_FORMAT).to_string()
}

/// Attempts made to find a free file name when the base name is taken
pub(crate) const MAX_NAME_ATTEMPTS: u32 = 100;

/// Returns `base` for attempt 0, otherwise inserts `_<attempt>` before the
/// extension
pub(crate) fn candidate_name(base: &str, attempt: u32) -> String {
    if attempt == 0 {
        return base.to_string();
    }
    match base.rsplit_once('.') {
        Some((stem, ext)) => format!("{}_{}.{}", stem, attempt, ext),
        None => format!("{}_{}", base, attempt),
    }
}
