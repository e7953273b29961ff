//! Trace utility execution
//!
//! Runs the configured path-trace program against one address, bounded by a
//! timeout. The output text is trusted as-is: a non-zero exit status that
//! still produced output counts as success.

use crate::config::ProbeConfig;
use crate::model::{ProbeOutcome, ProbeResult};
use async_trait::async_trait;
use std::net::IpAddr;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Traces the path to an address
#[async_trait]
pub trait Prober: Send + Sync {
    /// Probes `address`, giving up after `timeout`
    ///
    /// Never fails: launch errors and timeouts are reported through
    /// `ProbeResult::outcome`.
    async fn probe(&self, address: IpAddr, timeout: Duration) -> ProbeResult;
}

/// Prober that spawns an external command with the address as last argument
#[derive(Debug, Clone)]
pub struct CommandProber {
    program: String,
    args: Vec<String>,
}

impl CommandProber {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_config(config: &ProbeConfig) -> Self {
        Self::new(config.command.clone(), config.args.clone())
    }

    /// Runs the command and maps its termination to a `ProbeOutcome`
    async fn run(&self, address: IpAddr, timeout: Duration) -> ProbeOutcome {
        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(address.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Dropping the wait future on timeout kills the process.
            .kill_on_drop(true)
            .spawn();

        let child = match child {
            Ok(child) => child,
            Err(e) => {
                tracing::warn!(program = %self.program, error = %e, "Failed to launch trace utility");
                return ProbeOutcome::Failed(format!("failed to run {}: {}", self.program, e));
            }
        };

        match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Err(_) => {
                tracing::warn!(%address, ?timeout, "Trace timed out");
                ProbeOutcome::TimedOut
            }
            Ok(Err(e)) => ProbeOutcome::Failed(e.to_string()),
            Ok(Ok(output)) => {
                tracing::debug!(%address, status = %output.status, "Trace finished");
                let text = if output.stdout.is_empty() {
                    String::from_utf8_lossy(&output.stderr).into_owned()
                } else {
                    String::from_utf8_lossy(&output.stdout).into_owned()
                };
                ProbeOutcome::Success(text)
            }
        }
    }
}

impl Default for CommandProber {
    fn default() -> Self {
        Self::from_config(&ProbeConfig::default())
    }
}

#[async_trait]
impl Prober for CommandProber {
    async fn probe(&self, address: IpAddr, timeout: Duration) -> ProbeResult {
        let outcome = self.run(address, timeout).await;
        ProbeResult::new(address, outcome)
    }
}
