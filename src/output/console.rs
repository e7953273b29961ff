//! Console lines for completed units
//!
//! One human-readable line per outcome, printed as units complete.

use crate::model::{UnitOutcome, UnitStatus};

/// Formats the console line for a completed unit
pub fn outcome_line(outcome: &UnitOutcome) -> String {
    match (outcome.status, outcome.address) {
        (UnitStatus::Errored, _) => format!(
            "[!] Error processing {}: {}",
            outcome.domain,
            outcome.error.as_deref().unwrap_or("unknown error")
        ),
        (_, Some(address)) => format!("[✓] {} → {}", outcome.domain, address),
        (_, None) => format!("[×] {} → Failed to resolve", outcome.domain),
    }
}

/// Prints the console line for a completed unit
pub fn print_outcome(outcome: &UnitOutcome) {
    println!("{}", outcome_line(outcome));
}
