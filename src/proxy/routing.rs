//! Host-based route resolution.
//!
//! A [`RoutingTable`] holds an ordered list of [`Route`]s, one per
//! configured service, built once at startup and immutable thereafter
//! (the pools inside mutate; table membership does not). Resolution is
//! a deterministic in-order scan: the request host is lowercased and
//! stripped of any port, then compared for exact equality with each
//! pattern, first match wins. Substring matching (which could send
//! `example.com` traffic to `git.example.com`) is deliberately not
//! supported.

use std::time::Duration;

use crate::config::model::Config;
use crate::error::BackhaulError;
use crate::proxy::pool::{BackendPool, Upstream};

#[derive(Debug)]
pub struct Route {
    pattern: String,
    pool: BackendPool,
    timeout: Duration,
}

impl Route {
    #[must_use]
    pub fn new(pattern: &str, pool: BackendPool, timeout: Duration) -> Self {
        Self {
            pattern: pattern.to_ascii_lowercase(),
            pool,
            timeout,
        }
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    #[must_use]
    pub fn pool(&self) -> &BackendPool {
        &self.pool
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[derive(Debug)]
pub struct RoutingTable {
    routes: Vec<Route>,
}

impl RoutingTable {
    #[must_use]
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// Build the table from a validated config, resolving per-service
    /// overrides against the defaults.
    pub fn from_config(config: &Config) -> Result<Self, BackhaulError> {
        let mut routes = Vec::with_capacity(config.services.len());
        for service in &config.services {
            let upstreams = service
                .upstreams
                .iter()
                .map(|raw| {
                    Upstream::parse(raw).map_err(|e| BackhaulError::UriParse {
                        source: Box::new(e),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            let max_fail = service.max_fail.unwrap_or(config.defaults.max_fail);
            let pause = Duration::from_secs(service.pause.unwrap_or(config.defaults.pause));
            let timeout = Duration::from_millis(service.timeout.unwrap_or(config.defaults.timeout));

            routes.push(Route::new(
                &service.host,
                BackendPool::new(upstreams, max_fail, pause),
                timeout,
            ));
        }
        Ok(Self::new(routes))
    }

    /// Resolve the pool serving `request_host`, or `None` when no route
    /// matches. A miss is a distinct failure mode from an empty pool.
    #[must_use]
    pub fn resolve(&self, request_host: &str) -> Option<&Route> {
        let normalized = strip_port(request_host).to_ascii_lowercase();
        self.routes.iter().find(|r| r.pattern == normalized)
    }

    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}

/// Drop a trailing `:port` from a Host value, leaving bracketed IPv6
/// literals intact.
fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        host.find(']').map_or(host, |end| &host[..=end])
    } else {
        host.split(':').next().unwrap_or(host)
    }
}
