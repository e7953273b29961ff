//! Route-Survey main entry point
//!
//! This is the command-line interface for the Route-Survey diagnostics runner.

use clap::Parser;
use route_survey::config::{load_config, validate, Config};
use route_survey::output::print_summary;
use route_survey::{run_survey, ConfigResult};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Route-Survey: resolve and trace a list of domains
///
/// Route-Survey resolves each domain, runs the trace utility against the
/// resolved address on a bounded worker pool, stores each trace in its own
/// file and writes a CSV report with one row per domain.
#[derive(Parser, Debug)]
#[command(name = "route-survey")]
#[command(version = "1.0.0")]
#[command(about = "Bounded-concurrency DNS + traceroute survey", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Domain to survey; repeat to build the list (replaces configured domains)
    #[arg(short, long = "domain", value_name = "DOMAIN")]
    domains: Vec<String>,

    /// Maximum number of domains processed at once
    #[arg(short, long)]
    concurrency: Option<usize>,

    /// Probe timeout in seconds
    #[arg(short, long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Directory for trace files and the report
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error log output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be surveyed without running
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    match run_survey(config).await {
        Ok(summary) => {
            print_summary(&summary);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Survey failed: {}", e);
            Err(e.into())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("route_survey=info,warn"),
            1 => EnvFilter::new("route_survey=debug,info"),
            2 => EnvFilter::new("route_survey=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (or defaults) and applies command-line overrides
fn build_config(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)?
        }
        None => Config::default(),
    };

    Ok(apply_overrides(cli, config)?)
}

/// Applies command-line overrides and validates the result again
fn apply_overrides(cli: &Cli, mut config: Config) -> ConfigResult<Config> {
    if !cli.domains.is_empty() {
        config.domains = cli.domains.clone();
    }
    if let Some(concurrency) = cli.concurrency {
        config.runner.concurrency = concurrency;
    }
    if let Some(timeout) = cli.timeout {
        config.runner.probe_timeout_secs = timeout;
    }
    if let Some(dir) = &cli.output_dir {
        config.output.directory = dir.clone();
    }

    validate(&config)?;
    Ok(config)
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Route-Survey Dry Run ===\n");

    println!("Runner:");
    println!("  Concurrency: {}", config.runner.concurrency);
    println!("  Probe timeout: {}s", config.runner.probe_timeout_secs);

    println!("\nProbe command:");
    println!("  {} {} <address>", config.probe.command, config.probe.args.join(" "));

    println!("\nOutput directory: {}", config.output.directory.display());

    println!("\nDomains ({}):", config.domains.len());
    for domain in &config.domains {
        println!("  - {}", domain);
    }

    println!("\n✓ Configuration is valid");
}
