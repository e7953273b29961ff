use crate::config::types::{Config, OutputConfig, ProbeConfig, RunnerConfig};
use crate::{ConfigError, ConfigResult};

/// Upper bound for the worker pool size
const MAX_CONCURRENCY: usize = 100;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_runner_config(&config.runner)?;
    validate_probe_config(&config.probe)?;
    validate_output_config(&config.output)?;
    validate_domains(&config.domains)?;
    Ok(())
}

/// Validates worker pool configuration
fn validate_runner_config(config: &RunnerConfig) -> ConfigResult<()> {
    if config.concurrency < 1 || config.concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.concurrency
        )));
    }

    if config.probe_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "probe_timeout_secs must be >= 1, got {}",
            config.probe_timeout_secs
        )));
    }

    Ok(())
}

/// Validates the trace utility invocation
fn validate_probe_config(config: &ProbeConfig) -> ConfigResult<()> {
    if config.command.trim().is_empty() {
        return Err(ConfigError::Validation(
            "probe command cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> ConfigResult<()> {
    if config.directory.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the domain list
fn validate_domains(domains: &[String]) -> ConfigResult<()> {
    if domains.is_empty() {
        return Err(ConfigError::Validation(
            "at least one domain must be configured".to_string(),
        ));
    }

    for domain in domains {
        validate_domain_string(domain)?;
    }

    Ok(())
}

/// Validates a single host name
///
/// One trailing dot (fully qualified form) is accepted.
fn validate_domain_string(domain: &str) -> ConfigResult<()> {
    let domain = domain.strip_suffix('.').unwrap_or(domain);

    if domain.is_empty() {
        return Err(ConfigError::InvalidDomain(
            "Domain cannot be empty".to_string(),
        ));
    }

    // Artifact names embed the domain, so path separators must never pass.
    if !domain
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_')
    {
        return Err(ConfigError::InvalidDomain(format!(
            "Domain '{}' contains invalid characters",
            domain
        )));
    }

    if domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
    {
        return Err(ConfigError::InvalidDomain(format!(
            "Domain '{}' cannot start or end with '.' or '-'",
            domain
        )));
    }

    if domain.contains("..") {
        return Err(ConfigError::InvalidDomain(format!(
            "Domain '{}' cannot contain consecutive dots",
            domain
        )));
    }

    if domain.len() > 253 {
        return Err(ConfigError::InvalidDomain(format!(
            "Domain '{}' is longer than 253 characters",
            domain
        )));
    }

    Ok(())
}
