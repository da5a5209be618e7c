//! The `/health` diagnostics endpoint.
//!
//! Reports version, uptime, config metadata, request counters, and --
//! the part operators actually watch -- per-service pool membership:
//! which upstreams are in rotation and which sit suspended.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::server::AppState;

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub config: ConfigHealth,
    pub services: Vec<ServiceHealth>,
    pub stats: StatsResponse,
}

#[derive(Serialize, Deserialize)]
pub struct ConfigHealth {
    pub source: String,
    pub version: String,
    pub loaded_ago_seconds: u64,
    pub services: usize,
    pub upstreams: usize,
}

#[derive(Serialize, Deserialize)]
pub struct ServiceHealth {
    pub host: String,
    pub active: Vec<String>,
    pub suspended: Vec<String>,
}

#[derive(Serialize, Deserialize)]
pub struct StatsResponse {
    pub requests_forwarded: u64,
    pub requests_failed: u64,
}

pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let version_str = match &state.config_version {
        crate::config::ConfigVersion::Hash(h) => h.get(..8).unwrap_or(h).to_string(),
    };

    let services: Vec<ServiceHealth> = state
        .table
        .routes()
        .iter()
        .map(|route| {
            let snapshot = route.pool().snapshot();
            ServiceHealth {
                host: route.pattern().to_string(),
                active: snapshot.active,
                suspended: snapshot.suspended,
            }
        })
        .collect();

    let upstreams = services
        .iter()
        .map(|s| s.active.len() + s.suspended.len())
        .sum();

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        config: ConfigHealth {
            source: state.source_name.clone(),
            version: version_str,
            loaded_ago_seconds: state.loaded_at.elapsed().as_secs(),
            services: services.len(),
            upstreams,
        },
        services,
        stats: StatsResponse {
            requests_forwarded: state.stats.forwarded(),
            requests_failed: state.stats.failed(),
        },
    })
}
