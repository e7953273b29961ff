//! Data model shared by the resolver, prober, pipeline and report
//!
//! # Components
//!
//! - `ResolutionResult`: the outcome of resolving one domain
//! - `ProbeOutcome` / `ProbeResult`: the outcome of tracing one address
//! - `UnitOutcome` / `UnitStatus`: the terminal result of one domain's unit

mod outcome;
mod probe_result;

// Re-export main types
pub use outcome::{UnitOutcome, UnitStatus};
pub use probe_result::{ProbeOutcome, ProbeResult, ResolutionResult};
