//! Serde data structures for the backhaul configuration file.
//!
//! Contains [`Config`] (the root), [`Defaults`], and [`Service`]. All
//! types derive `Serialize` and `Deserialize` with
//! `deny_unknown_fields` for strict parsing. Per-service fields fall
//! back to the values in `defaults` when omitted.

use serde::{Deserialize, Serialize};

const fn default_timeout() -> u64 {
    30_000
}

const fn default_max_fail() -> u32 {
    3
}

const fn default_pause() -> u64 {
    120
}

fn is_default_timeout(v: &u64) -> bool {
    *v == default_timeout()
}

fn is_default_max_fail(v: &u32) -> bool {
    *v == default_max_fail()
}

fn is_default_pause(v: &u64) -> bool {
    *v == default_pause()
}

fn is_default_defaults(v: &Defaults) -> bool {
    v.timeout == default_timeout() && v.max_fail == default_max_fail() && v.pause == default_pause()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default, skip_serializing_if = "is_default_defaults")]
    pub defaults: Defaults,

    pub services: Vec<Service>,
}

impl Config {
    #[must_use]
    pub fn total_upstreams(&self) -> usize {
        self.services.iter().map(|s| s.upstreams.len()).sum()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Defaults {
    /// Per-outbound-call timeout in milliseconds.
    #[serde(
        default = "default_timeout",
        skip_serializing_if = "is_default_timeout"
    )]
    pub timeout: u64,

    /// Consecutive 502s before an upstream is suspended.
    #[serde(
        default = "default_max_fail",
        skip_serializing_if = "is_default_max_fail"
    )]
    pub max_fail: u32,

    /// Suspension cooldown in seconds.
    #[serde(default = "default_pause", skip_serializing_if = "is_default_pause")]
    pub pause: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            max_fail: default_max_fail(),
            pause: default_pause(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Service {
    /// Host this service answers for, matched exactly against the
    /// request's Host (case-insensitive, port ignored).
    pub host: String,

    pub upstreams: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_fail: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pause: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}
