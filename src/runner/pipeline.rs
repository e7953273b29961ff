//! Per-domain unit pipeline
//!
//! A unit resolves its domain and, only if that succeeds, probes the address
//! and writes the artifact. Whatever happens, `run` returns a `UnitOutcome`.

use crate::model::{ResolutionResult, UnitOutcome};
use crate::output::write_artifact;
use crate::probe::{Prober, Resolver};
use crate::SurveyError;
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

/// One schedulable unit of work, keyed by domain
///
/// Implementations must always produce an outcome; failures are reported
/// through `UnitOutcome` rather than returned.
#[async_trait]
pub trait Unit: Send + Sync {
    /// Runs the unit for `domain` to completion
    async fn run(&self, domain: &str) -> UnitOutcome;
}

/// Composes a resolver and a prober for one domain at a time
pub struct UnitPipeline<R, P> {
    resolver: R,
    prober: P,
    probe_timeout: Duration,
    output_dir: PathBuf,
}

impl<R: Resolver, P: Prober> UnitPipeline<R, P> {
    /// Creates a pipeline writing artifacts into `output_dir`
    pub fn new(resolver: R, prober: P, probe_timeout: Duration, output_dir: PathBuf) -> Self {
        Self {
            resolver,
            prober,
            probe_timeout,
            output_dir,
        }
    }

    /// Resolves `domain`, turning "not found" into an empty result
    pub async fn resolve(&self, domain: &str) -> Result<ResolutionResult, SurveyError> {
        let address = self.resolver.resolve(domain).await?;
        Ok(ResolutionResult::new(domain, address))
    }
}

#[async_trait]
impl<R: Resolver, P: Prober> Unit for UnitPipeline<R, P> {
    /// Runs the full unit for `domain`
    ///
    /// # Flow
    ///
    /// 1. Resolve. Not found → `Unresolved` outcome, no artifact.
    /// 2. Probe with the configured timeout.
    /// 3. Write the artifact for every probe outcome, including timeouts
    ///    and launch failures.
    ///
    /// Resolver failures and artifact write failures become an `Errored`
    /// outcome instead of propagating.
    async fn run(&self, domain: &str) -> UnitOutcome {
        let resolution = match self.resolve(domain).await {
            Ok(resolution) => resolution,
            Err(e) => {
                tracing::warn!(domain, error = %e, "Resolution error");
                return UnitOutcome::errored(domain, None, e.to_string());
            }
        };

        let Some(address) = resolution.address else {
            tracing::debug!(domain, "Domain did not resolve");
            return UnitOutcome::unresolved(domain);
        };

        tracing::debug!(domain, %address, "Probing");
        let probe = self.prober.probe(address, self.probe_timeout).await;
        tracing::debug!(domain, %address, outcome = %probe.outcome, "Probe finished");

        match write_artifact(&self.output_dir, domain, &probe).await {
            Ok(path) => UnitOutcome::traced(domain, address, path, &probe.outcome),
            Err(e) => {
                tracing::warn!(domain, error = %e, "Artifact write failed");
                UnitOutcome::errored(domain, Some(address), e.to_string())
            }
        }
    }
}
