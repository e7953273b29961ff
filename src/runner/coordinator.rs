//! Survey coordinator - composition root of a run
//!
//! The coordinator creates the output directory and the report, submits
//! every domain to the scheduler, drains outcomes into the report in
//! completion order, and times the whole run.

use crate::config::Config;
use crate::output::{print_outcome, ReportAggregator, RunSummary};
use crate::probe::{CommandProber, Prober, Resolver, SystemResolver};
use crate::runner::pipeline::UnitPipeline;
use crate::runner::scheduler::Scheduler;
use crate::SurveyError;
use chrono::Local;
use std::sync::Arc;
use std::time::Instant;

/// Main survey coordinator structure
pub struct Coordinator<R, P> {
    config: Arc<Config>,
    scheduler: Scheduler<UnitPipeline<R, P>>,
    console: bool,
}

impl Coordinator<SystemResolver, CommandProber> {
    /// Creates a coordinator using system DNS and the configured trace command
    pub fn from_config(config: Config) -> Self {
        let prober = CommandProber::from_config(&config.probe);
        Self::new(config, SystemResolver::new(), prober)
    }
}

impl<R, P> Coordinator<R, P>
where
    R: Resolver + 'static,
    P: Prober + 'static,
{
    /// Creates a coordinator with explicit resolver and prober
    pub fn new(config: Config, resolver: R, prober: P) -> Self {
        let pipeline = UnitPipeline::new(
            resolver,
            prober,
            config.runner.probe_timeout(),
            config.output.directory.clone(),
        );
        let scheduler = Scheduler::new(Arc::new(pipeline), config.runner.concurrency);

        Self {
            config: Arc::new(config),
            scheduler,
            console: true,
        }
    }

    /// Enables or disables the per-domain console lines
    pub fn with_console(mut self, console: bool) -> Self {
        self.console = console;
        self
    }

    /// Runs the survey over every configured domain
    ///
    /// # Returns
    ///
    /// * `Ok(RunSummary)` - All outcomes were written to the report
    /// * `Err(SurveyError)` - The output directory or report could not be
    ///   created or written; per-domain failures never end up here
    pub async fn run(&self) -> Result<RunSummary, SurveyError> {
        let start_time = Instant::now();
        let started_at = Local::now();
        let output_dir = &self.config.output.directory;

        std::fs::create_dir_all(output_dir)?;
        let mut report = ReportAggregator::create(output_dir, &started_at)?;

        let domains = self.config.domains.clone();
        tracing::info!(
            "Surveying {} domains with {} workers (probe timeout {:?})",
            domains.len(),
            self.scheduler.concurrency(),
            self.config.runner.probe_timeout()
        );

        let mut summary = RunSummary::new(domains.len());
        let mut outcomes = self.scheduler.submit_all(domains);

        while let Some(outcome) = outcomes.next().await {
            if self.console {
                print_outcome(&outcome);
            }
            tracing::debug!(
                domain = %outcome.domain,
                status = %outcome.status,
                in_flight = self.scheduler.in_flight(),
                "Unit completed ({}/{})",
                outcomes.received(),
                outcomes.expected()
            );
            summary.record(&outcome);
            report.append(&outcome)?;
        }

        summary.rows_written = report.rows();
        summary.report_path = report.path().to_path_buf();
        report.finish()?;
        summary.elapsed = start_time.elapsed();

        if !summary.is_complete() {
            tracing::error!(
                "Report has {} rows for {} domains",
                summary.rows_written,
                summary.total
            );
        }

        tracing::info!(
            "Survey completed: {} of {} domains resolved in {:?}",
            summary.resolved,
            summary.total,
            summary.elapsed
        );

        Ok(summary)
    }
}

/// Runs a complete survey with the default resolver and prober
///
/// This is the main entry point for a run. It will:
/// 1. Create the output directory and the CSV report
/// 2. Resolve and trace every domain on a bounded worker pool
/// 3. Append one report row per domain as units complete
/// 4. Flush the report and return the run statistics
pub async fn run_survey(config: Config) -> Result<RunSummary, SurveyError> {
    Coordinator::from_config(config).run().await
}
