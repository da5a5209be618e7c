//! Outbound request construction and execution against one upstream.
//!
//! [`forward`] rebuilds the inbound request for the selected upstream
//! (same method, same body, proxy headers applied), executes it under a
//! bounded timeout, and reduces everything that can go wrong to a
//! [`ForwardOutcome`]. The hyper client never follows redirects, so an
//! upstream redirect is relayed to the client as-is.

use std::time::{Duration, Instant};

use axum::http::{HeaderMap, Method, StatusCode, Uri};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};

use crate::server::HttpClient;

use super::headers::build_forwarded_headers;
use super::pool::Upstream;

/// Result of one forwarding attempt.
///
/// The synthetic variants never carry a body: `BadRequest` means the
/// outbound request could not be constructed (not an upstream
/// condition; the caller must not report it to the pool), while
/// `BadGateway` covers connect failures, timeouts, and any other
/// transport-level error on the way to or from the upstream (which
/// does count toward the pool's failure accounting).
#[derive(Debug)]
pub enum ForwardOutcome {
    Upstream {
        status: StatusCode,
        headers: HeaderMap,
        body: Bytes,
    },
    BadRequest,
    BadGateway,
}

impl ForwardOutcome {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Upstream { status, .. } => *status,
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::BadGateway => StatusCode::BAD_GATEWAY,
        }
    }
}

pub struct ForwardRequest<'a> {
    pub client: &'a HttpClient,
    pub upstream: &'a Upstream,
    pub method: &'a Method,
    pub uri: &'a Uri,
    pub headers: &'a HeaderMap,
    pub body: Bytes,
    pub client_ip: &'a str,
    pub timeout: Duration,
    pub correlation_id: &'a str,
}

#[allow(clippy::cast_possible_truncation)]
pub async fn forward(req: ForwardRequest<'_>) -> ForwardOutcome {
    let target = build_target_uri(req.upstream, req.uri);
    let forwarded_headers = build_forwarded_headers(req.headers, req.client_ip, req.upstream);

    let mut builder = hyper::Request::builder()
        .method(req.method.clone())
        .uri(&target);
    for (key, value) in &forwarded_headers {
        builder = builder.header(key, value);
    }

    let outbound = match builder.body(Full::new(req.body)) {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(
                correlation_id = %req.correlation_id,
                target = %target,
                error = %e,
                "failed to construct outbound request"
            );
            return ForwardOutcome::BadRequest;
        }
    };

    let start = Instant::now();
    let result = tokio::time::timeout(req.timeout, req.client.request(outbound)).await;
    let latency_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(Ok(response)) => {
            let status = response.status();
            let headers = response.headers().clone();
            match response.into_body().collect().await {
                Ok(collected) => {
                    tracing::info!(
                        correlation_id = %req.correlation_id,
                        upstream = %req.upstream.authority(),
                        status = status.as_u16(),
                        latency_ms,
                        "upstream responded"
                    );
                    ForwardOutcome::Upstream {
                        status,
                        headers,
                        body: collected.to_bytes(),
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        correlation_id = %req.correlation_id,
                        upstream = %req.upstream.authority(),
                        error = %e,
                        "upstream body read failed"
                    );
                    ForwardOutcome::BadGateway
                }
            }
        }
        Ok(Err(e)) => {
            tracing::warn!(
                correlation_id = %req.correlation_id,
                upstream = %req.upstream.authority(),
                error = %e,
                latency_ms,
                "upstream request failed"
            );
            ForwardOutcome::BadGateway
        }
        Err(_) => {
            tracing::warn!(
                correlation_id = %req.correlation_id,
                upstream = %req.upstream.authority(),
                timeout_ms = req.timeout.as_millis() as u64,
                "upstream request timed out"
            );
            ForwardOutcome::BadGateway
        }
    }
}

/// Assemble `scheme://authority` plus the inbound path, appending the
/// raw query only when non-empty.
fn build_target_uri(upstream: &Upstream, inbound: &Uri) -> String {
    let mut target = format!(
        "{}://{}{}",
        upstream.scheme(),
        upstream.authority(),
        inbound.path()
    );
    if let Some(query) = inbound.query() {
        if !query.is_empty() {
            target.push('?');
            target.push_str(query);
        }
    }
    target
}
