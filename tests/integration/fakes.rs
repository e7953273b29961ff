//! Scripted resolver and prober used by the integration tests

use async_trait::async_trait;
use route_survey::config::{Config, OutputConfig, ProbeConfig, RunnerConfig};
use route_survey::model::{ProbeOutcome, ProbeResult};
use route_survey::probe::{Prober, Resolver};
use route_survey::SurveyError;
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Tracks how many units are between their resolve call and probe end
#[derive(Debug, Default)]
pub struct Gauge {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl Gauge {
    pub fn enter(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    pub fn exit(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn current(&self) -> usize {
        self.current.load(Ordering::SeqCst)
    }
}

/// How a scripted domain behaves
#[derive(Debug, Clone)]
pub enum Script {
    /// Resolves and the probe prints a hop line
    Ok,
    /// Resolution returns "not found"
    NotFound,
    /// Resolves, but the probe never finishes on its own
    Slow,
    /// The resolver itself fails
    ResolverDown,
}

pub struct ScriptedResolver {
    scripts: HashMap<String, (Script, IpAddr)>,
    delay: Duration,
    gauge: Arc<Gauge>,
}

impl ScriptedResolver {
    pub fn new(domains: &[(&str, Script)], delay: Duration, gauge: Arc<Gauge>) -> Self {
        let scripts = domains
            .iter()
            .enumerate()
            .map(|(i, (name, script))| {
                let addr = IpAddr::V4(Ipv4Addr::new(192, 0, 2, (i % 250) as u8 + 1));
                (name.to_string(), (script.clone(), addr))
            })
            .collect();

        Self {
            scripts,
            delay,
            gauge,
        }
    }

    /// Domains in this resolver that should time out when probed
    pub fn slow_addresses(&self) -> Vec<IpAddr> {
        self.scripts
            .values()
            .filter(|(script, _)| matches!(script, Script::Slow))
            .map(|(_, addr)| *addr)
            .collect()
    }
}

#[async_trait]
impl Resolver for ScriptedResolver {
    async fn resolve(&self, domain: &str) -> Result<Option<IpAddr>, SurveyError> {
        self.gauge.enter();
        tokio::time::sleep(self.delay).await;

        match self.scripts.get(domain) {
            Some((Script::Ok, addr)) | Some((Script::Slow, addr)) => Ok(Some(*addr)),
            Some((Script::ResolverDown, _)) => {
                self.gauge.exit();
                Err(SurveyError::Resolver {
                    domain: domain.to_string(),
                    message: "resolver unavailable".to_string(),
                })
            }
            Some((Script::NotFound, _)) | None => {
                self.gauge.exit();
                Ok(None)
            }
        }
    }
}

pub struct ScriptedProber {
    slow: Vec<IpAddr>,
    delay: Duration,
    gauge: Arc<Gauge>,
}

impl ScriptedProber {
    pub fn new(slow: Vec<IpAddr>, delay: Duration, gauge: Arc<Gauge>) -> Self {
        Self { slow, delay, gauge }
    }
}

#[async_trait]
impl Prober for ScriptedProber {
    async fn probe(&self, address: IpAddr, timeout: Duration) -> ProbeResult {
        let work = if self.slow.contains(&address) {
            Duration::from_secs(600)
        } else {
            self.delay
        };

        let outcome = match tokio::time::timeout(timeout, tokio::time::sleep(work)).await {
            Ok(()) => ProbeOutcome::Success(format!(" 1  {}  0.123 ms\n", address)),
            Err(_) => ProbeOutcome::TimedOut,
        };

        self.gauge.exit();
        ProbeResult::new(address, outcome)
    }
}

/// Builds a config for `domains` writing into `dir`
pub fn test_config(domains: &[&str], concurrency: usize, timeout_secs: u64, dir: &Path) -> Config {
    Config {
        domains: domains.iter().map(|d| d.to_string()).collect(),
        runner: RunnerConfig {
            concurrency,
            probe_timeout_secs: timeout_secs,
        },
        probe: ProbeConfig::default(),
        output: OutputConfig {
            directory: dir.to_path_buf(),
        },
    }
}
