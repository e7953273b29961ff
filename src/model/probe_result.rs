//! Resolution and probe results
//!
//! These are produced by the resolver and prober and consumed by the unit
//! pipeline. Expected negative results (name not found, probe timeout) are
//! plain values here, not errors.
use chrono::{DateTime, Local};
use std::fmt;
use std::net::IpAddr;

/// Placeholder text written to an artifact when the probe timed out
pub const TIMEOUT_PLACEHOLDER: &str = "Traceroute timed out";

/// Result of resolving a single domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionResult {
    /// The domain that was resolved
    pub domain: String,

    /// The resolved address, present iff resolution succeeded
    pub address: Option<IpAddr>,

    /// When the resolution finished
    pub resolved_at: DateTime<Local>,
}

impl ResolutionResult {
    /// Creates a resolution result stamped with the current local time
    pub fn new(domain: impl Into<String>, address: Option<IpAddr>) -> Self {
        Self {
            domain: domain.into(),
            address,
            resolved_at: Local::now(),
        }
    }
}

/// Outcome of running the trace utility against one address
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The utility finished and produced this text (exit status is not checked)
    Success(String),

    /// The utility did not finish within the timeout and was killed
    TimedOut,

    /// The utility could not be run or waited on
    Failed(String),
}

impl ProbeOutcome {
    /// Returns the text to persist for this outcome
    ///
    /// Successful probes yield their captured output verbatim; timeouts and
    /// failures yield a placeholder line.
    pub fn artifact_text(&self) -> String {
        match self {
            Self::Success(text) => text.clone(),
            Self::TimedOut => TIMEOUT_PLACEHOLDER.to_string(),
            Self::Failed(reason) => format!("Traceroute error: {}", reason),
        }
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(_) => write!(f, "success"),
            Self::TimedOut => write!(f, "timed out"),
            Self::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// A probe outcome together with the address it was run against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    /// The probed address
    pub address: IpAddr,

    /// Text that ends up in the artifact body
    pub raw_output: String,

    /// How the probe ended
    pub outcome: ProbeOutcome,
}

impl ProbeResult {
    /// Builds a probe result, deriving `raw_output` from the outcome
    pub fn new(address: IpAddr, outcome: ProbeOutcome) -> Self {
        Self {
            address,
            raw_output: outcome.artifact_text(),
            outcome,
        }
    }
}
