//! Round-robin backend pool with failure gating.
//!
//! A [`BackendPool`] owns the upstreams configured for one service: an
//! ordered active sequence with a wrapping cursor, a per-host count of
//! consecutive gateway failures, and a suspension list holding ejected
//! upstreams together with their ejection time. Every upstream is in
//! exactly one of {active, suspended} at all times. All state sits
//! behind a single mutex; callers clone the selected [`Upstream`] out
//! so the outbound call never runs under the lock.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use http::StatusCode;
use serde::Serialize;

/// One upstream endpoint: scheme plus authority (`host[:port]`),
/// parsed once at startup. Immutable value; the authority doubles as
/// the identity used for failure accounting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upstream {
    scheme: String,
    authority: String,
}

impl Upstream {
    pub fn parse(raw: &str) -> Result<Self, url::ParseError> {
        let parsed = url::Url::parse(raw)?;
        let host = parsed.host_str().ok_or(url::ParseError::EmptyHost)?;
        let authority = parsed
            .port()
            .map_or_else(|| host.to_string(), |port| format!("{host}:{port}"));
        Ok(Self {
            scheme: parsed.scheme().to_string(),
            authority,
        })
    }

    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    #[must_use]
    pub fn authority(&self) -> &str {
        &self.authority
    }
}

#[derive(Debug)]
struct PoolState {
    active: Vec<Upstream>,
    cursor: usize,
    fail_counts: HashMap<String, u32>,
    suspended: Vec<(Upstream, Instant)>,
}

/// Point-in-time view of a pool, for the health endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct PoolSnapshot {
    pub active: Vec<String>,
    pub suspended: Vec<String>,
}

#[derive(Debug)]
pub struct BackendPool {
    max_fail: u32,
    pause: Duration,
    state: Mutex<PoolState>,
}

impl BackendPool {
    #[must_use]
    pub fn new(upstreams: Vec<Upstream>, max_fail: u32, pause: Duration) -> Self {
        Self {
            max_fail,
            pause,
            state: Mutex::new(PoolState {
                active: upstreams,
                cursor: 0,
                fail_counts: HashMap::new(),
                suspended: Vec::new(),
            }),
        }
    }

    // Every mutation re-establishes the pool invariants before
    // returning, so a poisoned lock still holds consistent state.
    fn lock(&self) -> MutexGuard<'_, PoolState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Take the next upstream in rotation, or `None` when the active
    /// sequence is empty (every upstream currently suspended).
    pub fn select(&self) -> Option<Upstream> {
        let mut guard = self.lock();
        let state = &mut *guard;

        if state.active.is_empty() {
            return None;
        }
        // Ejections shrink the active sequence, so wrap before indexing.
        if state.cursor >= state.active.len() {
            state.cursor = 0;
        }
        let upstream = state.active[state.cursor].clone();
        state.cursor += 1;
        Some(upstream)
    }

    /// Record the outcome of one forwarded request.
    ///
    /// Only 502 counts toward the failure threshold; an upstream that
    /// reaches it is moved from the active sequence into suspension and
    /// its count reset. Suspensions older than the cooldown are promoted
    /// back into rotation on the same call. There is no background
    /// timer, so promotion latency is bounded by request arrival rate.
    pub fn record_outcome(&self, host: &str, status: StatusCode) {
        let now = Instant::now();
        let mut guard = self.lock();
        let state = &mut *guard;

        if status == StatusCode::BAD_GATEWAY {
            let reached = {
                let count = state.fail_counts.entry(host.to_string()).or_insert(0);
                *count += 1;
                *count >= self.max_fail
            };
            if reached {
                // Identity-based removal keeps the rest of the rotation
                // order intact. A concurrent request may have ejected
                // this host already; then only the count reset applies.
                if let Some(idx) = state.active.iter().position(|u| u.authority() == host) {
                    let upstream = state.active.remove(idx);
                    tracing::warn!(upstream = %upstream.authority(), "upstream suspended");
                    state.suspended.push((upstream, now));
                }
                state.fail_counts.insert(host.to_string(), 0);
            }
        }

        // Re-admit everything whose cooldown has elapsed, at the end of
        // the rotation.
        let mut kept = Vec::with_capacity(state.suspended.len());
        for (upstream, since) in state.suspended.drain(..) {
            if now.duration_since(since) >= self.pause {
                tracing::info!(upstream = %upstream.authority(), "upstream re-admitted");
                state.active.push(upstream);
            } else {
                kept.push((upstream, since));
            }
        }
        state.suspended = kept;
    }

    #[must_use]
    pub fn snapshot(&self) -> PoolSnapshot {
        let state = self.lock();
        PoolSnapshot {
            active: state
                .active
                .iter()
                .map(|u| u.authority().to_string())
                .collect(),
            suspended: state
                .suspended
                .iter()
                .map(|(u, _)| u.authority().to_string())
                .collect(),
        }
    }
}
