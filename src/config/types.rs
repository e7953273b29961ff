use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Domains surveyed when no list is configured
pub const DEFAULT_DOMAINS: &[&str] = &[
    "google.com",
    "youtube.com",
    "github.com",
    "stackoverflow.com",
    "amazon.com",
    "microsoft.com",
    "twitter.com",
    "linkedin.com",
];

/// Main configuration structure for Route-Survey
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_domains")]
    pub domains: Vec<String>,
    #[serde(default)]
    pub runner: RunnerConfig,
    #[serde(default)]
    pub probe: ProbeConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            domains: default_domains(),
            runner: RunnerConfig::default(),
            probe: ProbeConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

fn default_domains() -> Vec<String> {
    DEFAULT_DOMAINS.iter().map(|d| d.to_string()).collect()
}

/// Worker pool configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RunnerConfig {
    /// Maximum number of domains processed at the same time
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Upper bound on a single trace run (seconds)
    #[serde(rename = "probe-timeout-secs", default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,
}

impl RunnerConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            probe_timeout_secs: default_probe_timeout(),
        }
    }
}

fn default_concurrency() -> usize {
    5
}

fn default_probe_timeout() -> u64 {
    30
}

/// External trace utility invocation
#[derive(Debug, Clone, Deserialize)]
pub struct ProbeConfig {
    /// Program to execute
    #[serde(default = "default_command")]
    pub command: String,

    /// Arguments passed before the target address
    #[serde(default = "default_args")]
    pub args: Vec<String>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            args: default_args(),
        }
    }
}

fn default_command() -> String {
    "traceroute".to_string()
}

// Numeric output, one query per hop, one second wait per hop.
fn default_args() -> Vec<String> {
    ["-n", "-q", "1", "-w", "1"]
        .iter()
        .map(|a| a.to_string())
        .collect()
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving the trace artifacts and the CSV report
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
        }
    }
}

fn default_directory() -> PathBuf {
    PathBuf::from(".")
}
