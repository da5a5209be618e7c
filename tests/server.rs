//! Integration tests for the HTTP server, health endpoint, and graceful shutdown.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use backhaul::config::ConfigVersion;
use backhaul::health::HealthResponse;
use backhaul::proxy::pool::{BackendPool, Upstream};
use backhaul::proxy::routing::{Route, RoutingTable};
use backhaul::server::{self, AppState, Stats};

fn test_table() -> RoutingTable {
    let pool = BackendPool::new(
        vec![Upstream::parse("http://localhost:19999").unwrap()],
        3,
        Duration::from_secs(120),
    );
    RoutingTable::new(vec![Route::new("app.test", pool, Duration::from_secs(5))])
}

async fn start_test_server() -> (SocketAddr, tokio::sync::oneshot::Sender<()>) {
    let state = Arc::new(AppState {
        table: test_table(),
        http_client: server::build_http_client(),
        start_time: Instant::now(),
        source_name: "test".into(),
        config_version: ConfigVersion::Hash("0123456789abcdef".into()),
        loaded_at: Instant::now(),
        stats: Stats::default(),
    });

    let router = server::build_router(state, 1_048_576);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async {
            let _ = shutdown_rx.await;
        })
        .await
        .unwrap();
    });

    (addr, shutdown_tx)
}

#[tokio::test]
async fn health_endpoint_returns_healthy() {
    let (addr, shutdown) = start_test_server().await;

    let url = format!("http://{addr}/health");
    let resp = reqwest::get(&url).await.unwrap();
    assert_eq!(resp.status(), 200);

    let health: HealthResponse = resp.json().await.unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.config.source, "test");
    // The health endpoint shortens the hash to its first 8 characters.
    assert_eq!(health.config.version, "01234567");
    assert_eq!(health.config.services, 1);
    assert_eq!(health.config.upstreams, 1);
    assert_eq!(health.stats.requests_forwarded, 0);
    assert_eq!(health.stats.requests_failed, 0);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn health_reports_pool_membership() {
    let (addr, shutdown) = start_test_server().await;

    let url = format!("http://{addr}/health");
    let health: HealthResponse = reqwest::get(&url).await.unwrap().json().await.unwrap();

    assert_eq!(health.services.len(), 1);
    assert_eq!(health.services[0].host, "app.test");
    assert_eq!(health.services[0].active, vec!["localhost:19999"]);
    assert!(health.services[0].suspended.is_empty());

    let _ = shutdown.send(());
}

#[tokio::test]
async fn unmatched_host_returns_404() {
    let (addr, shutdown) = start_test_server().await;

    let url = format!("http://{addr}/anything");
    let resp = reqwest::get(&url).await.unwrap();
    assert_eq!(resp.status(), 404);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn health_version_matches_crate() {
    let (addr, shutdown) = start_test_server().await;

    let url = format!("http://{addr}/health");
    let health: HealthResponse = reqwest::get(&url).await.unwrap().json().await.unwrap();
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));

    let _ = shutdown.send(());
}

#[tokio::test]
async fn graceful_shutdown_works() {
    let (addr, shutdown) = start_test_server().await;

    // Verify server is running
    let url = format!("http://{addr}/health");
    assert!(reqwest::get(&url).await.is_ok());

    // Send shutdown
    let _ = shutdown.send(());

    // Give it a moment to shut down
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    // Server should no longer accept connections
    let result = reqwest::get(&url).await;
    assert!(result.is_err());
}
