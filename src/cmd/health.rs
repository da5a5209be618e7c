//! `backhaul health` — query a running instance's `/health` endpoint.
//!
//! Fetches the health JSON over plain HTTP and prints either a
//! formatted summary or the raw payload (`--json`).

use std::time::Duration;

use http_body_util::BodyExt;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use crate::cli::HealthArgs;
use crate::error::BackhaulError;
use crate::health::HealthResponse;

const HEALTH_TIMEOUT: Duration = Duration::from_secs(10);

pub async fn execute(args: HealthArgs) -> Result<(), BackhaulError> {
    let body = fetch_health(&args.url).await?;

    if args.json {
        println!("{}", String::from_utf8_lossy(&body));
        return Ok(());
    }

    match serde_json::from_slice::<HealthResponse>(&body) {
        Ok(health) => print_summary(&args.url, &health),
        Err(e) => {
            eprintln!("Failed to parse health response: {e}");
            println!("{}", String::from_utf8_lossy(&body));
        }
    }
    Ok(())
}

async fn fetch_health(base: &str) -> Result<bytes::Bytes, BackhaulError> {
    let http_err = |e: Box<dyn std::error::Error + Send + Sync>| BackhaulError::HttpRequest {
        source: e,
    };

    let uri: hyper::Uri = format!("{}/health", base.trim_end_matches('/'))
        .parse()
        .map_err(|e: hyper::http::uri::InvalidUri| BackhaulError::UriParse {
            source: Box::new(e),
        })?;

    let client = Client::builder(TokioExecutor::new())
        .build(hyper_util::client::legacy::connect::HttpConnector::new());
    let request = hyper::Request::builder()
        .uri(uri)
        .body(http_body_util::Full::new(bytes::Bytes::new()))
        .map_err(|e| http_err(Box::new(e)))?;

    let response = tokio::time::timeout(HEALTH_TIMEOUT, client.request(request))
        .await
        .map_err(|_| http_err("health check timed out after 10s".into()))?
        .map_err(|e| http_err(Box::new(e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(BackhaulError::HealthCheckFailed(status));
    }

    let collected = response
        .into_body()
        .collect()
        .await
        .map_err(|e| http_err(Box::new(e)))?;
    Ok(collected.to_bytes())
}

fn print_summary(url: &str, health: &HealthResponse) {
    println!("\u{2713} backhaul is healthy ({url})");
    println!("  uptime:         {}", format_uptime(health.uptime_seconds));
    println!("  config source:  {}", health.config.source);
    println!(
        "  config version: {} (loaded {}s ago)",
        health.config.version, health.config.loaded_ago_seconds
    );
    println!(
        "  services:       {} services, {} upstreams",
        health.config.services, health.config.upstreams
    );
    for service in &health.services {
        println!(
            "    {}: {} active, {} suspended",
            service.host,
            service.active.len(),
            service.suspended.len()
        );
    }
    println!(
        "  requests:       {} forwarded, {} failed",
        health.stats.requests_forwarded, health.stats.requests_failed
    );
}

fn format_uptime(total: u64) -> String {
    let (hours, rem) = (total / 3600, total % 3600);
    let (minutes, seconds) = (rem / 60, rem % 60);
    match (hours, minutes) {
        (0, 0) => format!("{seconds}s"),
        (0, _) => format!("{minutes}m {seconds}s"),
        _ => format!("{hours}h {minutes}m {seconds}s"),
    }
}
