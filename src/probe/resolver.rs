//! Domain name resolution
//!
//! Maps a domain to a single address. "Name not found" is a normal negative
//! result (`Ok(None)`); only failures of the resolver itself are errors.

use crate::SurveyError;
use async_trait::async_trait;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::TokioAsyncResolver;
use std::net::IpAddr;

/// Resolves a domain to an address
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Resolves `domain`
    ///
    /// # Returns
    ///
    /// * `Ok(Some(addr))` - The domain resolved
    /// * `Ok(None)` - The domain does not exist or has no address records
    /// * `Err(SurveyError::Resolver)` - The resolver itself failed
    async fn resolve(&self, domain: &str) -> Result<Option<IpAddr>, SurveyError>;
}

/// Resolver backed by the host's DNS configuration
pub struct SystemResolver {
    inner: TokioAsyncResolver,
}

impl SystemResolver {
    /// Creates a resolver from the system configuration
    ///
    /// Falls back to hickory's default upstream servers when the system
    /// configuration cannot be read (e.g. no `/etc/resolv.conf`).
    pub fn new() -> Self {
        let inner = match TokioAsyncResolver::tokio_from_system_conf() {
            Ok(resolver) => resolver,
            Err(e) => {
                tracing::warn!(error = %e, "System resolver config unavailable, using defaults");
                TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default())
            }
        };

        Self { inner }
    }
}

impl Default for SystemResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Resolver for SystemResolver {
    async fn resolve(&self, domain: &str) -> Result<Option<IpAddr>, SurveyError> {
        tracing::debug!(domain, "Resolving");
        match self.inner.lookup_ip(domain).await {
            Ok(lookup) => Ok(select_address(lookup.iter())),
            Err(e) if is_not_found(&e) => {
                tracing::debug!(domain, error = %e, "No address records");
                Ok(None)
            }
            Err(e) => Err(SurveyError::Resolver {
                domain: domain.to_string(),
                message: e.to_string(),
            }),
        }
    }
}

fn is_not_found(error: &ResolveError) -> bool {
    matches!(error.kind(), ResolveErrorKind::NoRecordsFound { .. })
}

/// Picks the address to trace, preferring IPv4 like `gethostbyname`
fn select_address(addresses: impl Iterator<Item = IpAddr>) -> Option<IpAddr> {
    let mut fallback = None;
    for addr in addresses {
        if addr.is_ipv4() {
            return Some(addr);
        }
        fallback.get_or_insert(addr);
    }
    fallback
}
