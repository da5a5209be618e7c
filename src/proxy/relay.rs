//! Client-facing response shaping.
//!
//! [`client_response`] turns a [`ForwardOutcome`] into the response
//! written back to the client. Relays with status 502 or 504 get an
//! empty body: upstream gateway-error bodies are deliberately
//! suppressed, not lost by accident. Everything else is passed through
//! with the hop-by-hop set stripped and the proxy marker applied.

use axum::body::Body;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use super::forward::ForwardOutcome;
use super::headers::{strip_response_hop_by_hop, PROXY_MARKER};

pub fn client_response(outcome: ForwardOutcome, correlation_id: &str) -> Response {
    match outcome {
        ForwardOutcome::BadRequest => empty_response(StatusCode::BAD_REQUEST, correlation_id),
        ForwardOutcome::BadGateway => empty_response(StatusCode::BAD_GATEWAY, correlation_id),
        ForwardOutcome::Upstream {
            status,
            mut headers,
            body,
        } => {
            if status == StatusCode::BAD_GATEWAY || status == StatusCode::GATEWAY_TIMEOUT {
                return empty_response(status, correlation_id);
            }

            strip_response_hop_by_hop(&mut headers);
            let mut builder = Response::builder().status(status);
            for (key, value) in &headers {
                builder = builder.header(key, value);
            }
            builder
                .header(PROXY_MARKER, "true")
                .header("x-correlation-id", correlation_id)
                .body(Body::from(body))
                .unwrap_or_else(|e| {
                    tracing::error!(
                        correlation_id = %correlation_id,
                        error = %e,
                        "failed to build relayed response"
                    );
                    StatusCode::BAD_GATEWAY.into_response()
                })
        }
    }
}

fn empty_response(status: StatusCode, correlation_id: &str) -> Response {
    Response::builder()
        .status(status)
        .header("x-correlation-id", correlation_id)
        .body(Body::empty())
        .unwrap_or_else(|_| status.into_response())
}
