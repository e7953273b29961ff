//! Route-Survey: a bounded-concurrency network diagnostics runner
//!
//! This crate resolves a list of domains, runs a path trace against each
//! resolved address, stores the raw trace output per domain and aggregates
//! a CSV report, with at most a fixed number of domains in flight at once.

pub mod config;
pub mod model;
pub mod output;
pub mod probe;
pub mod runner;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Route-Survey operations
#[derive(Debug, Error)]
pub enum SurveyError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Resolver failure for {domain}: {message}")]
    Resolver { domain: String, message: String },

    #[error("Failed to write artifact {}: {source}", .path.display())]
    Artifact {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write report {}: {source}", .path.display())]
    Report {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Worker task failed: {0}")]
    Task(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid domain: {0}")]
    InvalidDomain(String),
}

/// Result type alias for Route-Survey operations
pub type Result<T> = std::result::Result<T, SurveyError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use model::{ProbeOutcome, UnitOutcome, UnitStatus};
pub use runner::{run_survey, Coordinator};
