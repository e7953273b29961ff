//! Unit outcome definitions
//!
//! A `UnitOutcome` is the only value that crosses from the scheduler to the
//! report aggregator. Every submitted domain produces exactly one.
use crate::model::ProbeOutcome;
use chrono::{DateTime, Local};
use std::fmt;
use std::net::IpAddr;
use std::path::PathBuf;

/// Terminal classification of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitStatus {
    /// Domain resolved and the probe produced output
    Traced,

    /// Domain resolved but the probe hit its timeout
    TimedOut,

    /// Domain resolved but the trace utility could not run
    ProbeFailed,

    /// Domain did not resolve; no artifact was written
    Unresolved,

    /// An unexpected error interrupted the unit
    Errored,
}

impl UnitStatus {
    /// Returns true if the unit got far enough to write an artifact
    pub fn has_artifact(&self) -> bool {
        matches!(self, Self::Traced | Self::TimedOut | Self::ProbeFailed)
    }

    /// Maps a probe outcome to the status of a unit that reached probing
    pub fn from_probe(outcome: &ProbeOutcome) -> Self {
        match outcome {
            ProbeOutcome::Success(_) => Self::Traced,
            ProbeOutcome::TimedOut => Self::TimedOut,
            ProbeOutcome::Failed(_) => Self::ProbeFailed,
        }
    }
}

impl fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Traced => "traced",
            Self::TimedOut => "timed_out",
            Self::ProbeFailed => "probe_failed",
            Self::Unresolved => "unresolved",
            Self::Errored => "errored",
        };
        write!(f, "{}", s)
    }
}

/// Structured result of one domain's resolve, probe and persist sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitOutcome {
    /// The input domain
    pub domain: String,

    /// Resolved address; `None` when resolution failed
    pub address: Option<IpAddr>,

    /// Path of the written artifact, if the unit reached probing
    pub artifact_path: Option<PathBuf>,

    /// Error text for unexpected failures, or the probe failure reason
    pub error: Option<String>,

    /// Terminal classification
    pub status: UnitStatus,

    /// When the unit finished
    pub completed_at: DateTime<Local>,
}

impl UnitOutcome {
    /// Outcome for a domain that failed to resolve
    pub fn unresolved(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            address: None,
            artifact_path: None,
            error: None,
            status: UnitStatus::Unresolved,
            completed_at: Local::now(),
        }
    }

    /// Outcome for a domain that was probed and had its artifact written
    pub fn traced(
        domain: impl Into<String>,
        address: IpAddr,
        artifact_path: PathBuf,
        probe: &ProbeOutcome,
    ) -> Self {
        let error = match probe {
            ProbeOutcome::Success(_) => None,
            other => Some(other.artifact_text()),
        };

        Self {
            domain: domain.into(),
            address: Some(address),
            artifact_path: Some(artifact_path),
            error,
            status: UnitStatus::from_probe(probe),
            completed_at: Local::now(),
        }
    }

    /// Outcome for a unit interrupted by an unexpected error
    pub fn errored(
        domain: impl Into<String>,
        address: Option<IpAddr>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            address,
            artifact_path: None,
            error: Some(message.into()),
            status: UnitStatus::Errored,
            completed_at: Local::now(),
        }
    }

    /// Returns true if the domain resolved to an address
    pub fn is_resolved(&self) -> bool {
        self.address.is_some()
    }
}
