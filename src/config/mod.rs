//! Configuration module for Route-Survey
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional; the defaults trace eight well-known domains with
//! five concurrent workers and a 30 second probe timeout.
//!
//! # Example
//!
//! ```no_run
//! use route_survey::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("survey.toml")).unwrap();
//! println!("Concurrency: {}", config.runner.concurrency);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, OutputConfig, ProbeConfig, RunnerConfig, DEFAULT_DOMAINS};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
