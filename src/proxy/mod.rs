//! Core HTTP request forwarding handler.
//!
//! The [`proxy_handler`] function is the axum fallback that receives
//! every non-`/health` request. It resolves the backend pool for the
//! request's host, takes the next upstream in rotation, forwards the
//! request (outside the pool lock, so a hanging upstream never
//! serializes other traffic), relays the result, and reports the
//! outcome back into the pool. Submodules hold the pool ([`pool`]),
//! host matching ([`routing`]), header hygiene ([`headers`]), outbound
//! execution ([`forward`]), and response shaping ([`relay`]).

pub mod forward;
pub mod headers;
pub mod pool;
pub mod relay;
pub mod routing;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{ConnectInfo, State};
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};

use crate::server::AppState;

use forward::{ForwardOutcome, ForwardRequest};

pub async fn proxy_handler(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    method: Method,
    uri: Uri,
    req_headers: HeaderMap,
    body: Bytes,
) -> Response {
    let correlation_id = req_headers
        .get("x-correlation-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| uuid::Uuid::new_v4().to_string(), String::from);

    let host = request_host(&req_headers, &uri).unwrap_or_default();

    let Some(route) = state.table.resolve(host) else {
        tracing::warn!(
            correlation_id = %correlation_id,
            method = %method,
            host = %host,
            "no service for host"
        );
        state.stats.count_failed();
        return StatusCode::NOT_FOUND.into_response();
    };

    // The pool lock is scoped to selection; the outbound call below
    // runs without it.
    let Some(upstream) = route.pool().select() else {
        tracing::warn!(
            correlation_id = %correlation_id,
            host = %host,
            "all upstreams suspended"
        );
        state.stats.count_failed();
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    };

    tracing::info!(
        correlation_id = %correlation_id,
        method = %method,
        host = %host,
        path = %uri.path(),
        upstream = %upstream.authority(),
        "request received"
    );

    let client_ip = addr.ip().to_string();
    let outcome = forward::forward(ForwardRequest {
        client: &state.http_client,
        upstream: &upstream,
        method: &method,
        uri: &uri,
        headers: &req_headers,
        body,
        client_ip: &client_ip,
        timeout: route.timeout(),
        correlation_id: &correlation_id,
    })
    .await;

    let status = outcome.status();
    // A construction failure is not an upstream condition and must not
    // move the failure counters.
    let report = !matches!(outcome, ForwardOutcome::BadRequest);
    let synthetic = matches!(
        outcome,
        ForwardOutcome::BadRequest | ForwardOutcome::BadGateway
    );

    let response = relay::client_response(outcome, &correlation_id);

    if report {
        route.pool().record_outcome(upstream.authority(), status);
    }

    if synthetic {
        state.stats.count_failed();
    } else {
        state.stats.count_forwarded();
    }

    response
}

/// The host the client addressed: the `Host` header when present,
/// otherwise the authority of an absolute-form request target.
fn request_host<'a>(headers: &'a HeaderMap, uri: &'a Uri) -> Option<&'a str> {
    headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| uri.host())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_header_takes_precedence() {
        let mut headers = HeaderMap::new();
        headers.insert("host", "app.example.com".parse().unwrap());
        let uri: Uri = "http://other.example.com/path".parse().unwrap();

        assert_eq!(request_host(&headers, &uri), Some("app.example.com"));
    }

    #[test]
    fn falls_back_to_uri_authority() {
        let headers = HeaderMap::new();
        let uri: Uri = "http://app.example.com/path".parse().unwrap();

        assert_eq!(request_host(&headers, &uri), Some("app.example.com"));
    }

    #[test]
    fn no_host_anywhere_is_none() {
        let headers = HeaderMap::new();
        let uri: Uri = "/path".parse().unwrap();

        assert_eq!(request_host(&headers, &uri), None);
    }
}
