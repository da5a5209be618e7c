//! HTTP server wiring and shared state.
//!
//! [`AppState`] is the `Arc`-shared bundle every handler sees: the
//! immutable routing table, the pooled outbound client, config
//! metadata for `/health`, and request counters. [`build_router`]
//! assembles the axum router, [`build_http_client`] the hyper client,
//! and [`shutdown_signal`] resolves when the process is asked to stop.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::routing::get;
use axum::Router;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::config::ConfigVersion;
use crate::health::health_handler;
use crate::proxy;
use crate::proxy::routing::RoutingTable;

/// Monotonic request counters, relaxed ordering throughout (the values
/// are diagnostics, not synchronization).
#[derive(Debug, Default)]
pub struct Stats {
    forwarded: AtomicU64,
    failed: AtomicU64,
}

impl Stats {
    pub fn count_forwarded(&self) {
        self.forwarded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn count_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn forwarded(&self) -> u64 {
        self.forwarded.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }
}

pub type HttpsConnector =
    hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>;
pub type HttpClient = Client<HttpsConnector, http_body_util::Full<bytes::Bytes>>;

pub struct AppState {
    pub table: RoutingTable,
    pub http_client: HttpClient,
    pub start_time: Instant,
    pub source_name: String,
    pub config_version: ConfigVersion,
    pub loaded_at: Instant,
    pub stats: Stats,
}

/// Build the pooled outbound client. The connector speaks plain HTTP
/// and HTTPS, so upstream URLs may use either scheme even though the
/// listener itself never terminates TLS.
#[must_use]
pub fn build_http_client() -> HttpClient {
    // rustls refuses to guess between multiple compiled-in crypto
    // providers; pin ring explicitly.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let connector = hyper_rustls::HttpsConnectorBuilder::new()
        .with_webpki_roots()
        .https_or_http()
        .enable_http1()
        .build();

    Client::builder(TokioExecutor::new())
        .pool_idle_timeout(Duration::from_secs(30))
        .build(connector)
}

pub fn build_router(state: Arc<AppState>, max_body: usize) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .fallback(proxy::proxy_handler)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(max_body)),
        )
        .with_state(state)
}

/// Resolves on Ctrl+C or, on unix, SIGTERM. A handler that cannot be
/// installed logs the problem and parks forever rather than forcing an
/// immediate shutdown.
pub async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => tracing::info!("Ctrl+C received, draining"),
        () = terminate => tracing::info!("SIGTERM received, draining"),
    }
}
