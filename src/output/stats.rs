//! Run statistics
//!
//! Counts outcomes by status while the report is drained and prints the
//! closing summary of a run.

use crate::model::{UnitOutcome, UnitStatus};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Summary of a completed survey run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Where the CSV report was written
    pub report_path: PathBuf,

    /// Number of domains submitted
    pub total: usize,

    /// Number of rows written to the report
    pub rows_written: usize,

    /// Outcome counts by status
    pub by_status: HashMap<UnitStatus, usize>,

    /// Number of domains that resolved to an address
    pub resolved: usize,

    /// Number of trace artifacts written
    pub artifacts: usize,

    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl RunSummary {
    /// Creates an empty summary for a run over `total` domains
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// Records one completed unit
    pub fn record(&mut self, outcome: &UnitOutcome) {
        *self.by_status.entry(outcome.status).or_insert(0) += 1;
        if outcome.is_resolved() {
            self.resolved += 1;
        }
        if outcome.status.has_artifact() {
            self.artifacts += 1;
        }
    }

    /// Number of outcomes with the given status
    pub fn count(&self, status: UnitStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }

    /// Number of outcomes recorded so far
    pub fn completed(&self) -> usize {
        self.by_status.values().sum()
    }

    /// Returns true if every submitted domain produced a report row
    pub fn is_complete(&self) -> bool {
        self.rows_written == self.total && self.completed() == self.total
    }
}

/// Prints the closing lines of a run to stdout
pub fn print_summary(summary: &RunSummary) {
    println!();
    println!(
        "Resolved {}/{} domains ({} traced, {} timed out, {} probe failures, {} errors)",
        summary.resolved,
        summary.total,
        summary.count(UnitStatus::Traced),
        summary.count(UnitStatus::TimedOut),
        summary.count(UnitStatus::ProbeFailed),
        summary.count(UnitStatus::Errored),
    );
    println!("Trace files written: {}", summary.artifacts);
    println!("\nReport saved to: {}", summary.report_path.display());
    println!("\nExecution time: {:.2} seconds", summary.elapsed.as_secs_f64());
}
