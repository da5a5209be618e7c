//! Header hygiene for both directions of the proxy.
//!
//! Hop-by-hop headers belong to a single transport connection and must
//! not cross the proxy; the same fixed set is dropped from outbound
//! requests and relayed responses. Outbound requests additionally get
//! `Host` rewritten to the target, the client address appended to
//! `X-Forwarded-For`, and the `X-Proxy-Enable` marker.

use std::sync::LazyLock;

use axum::http::{HeaderMap, HeaderName, HeaderValue};

use crate::proxy::pool::Upstream;

pub const PROXY_MARKER: &str = "x-proxy-enable";

static HOP_BY_HOP: LazyLock<[HeaderName; 9]> = LazyLock::new(|| {
    [
        "connection",
        "keep-alive",
        "proxy-authenticate",
        "proxy-authorization",
        "proxy-connection",
        "te",
        "trailers",
        "transfer-encoding",
        "upgrade",
    ]
    .map(HeaderName::from_static)
});

/// Drop hop-by-hop headers and `content-length` from an upstream
/// response. The body was fully collected, so the origin's framing
/// headers no longer describe what goes out; axum recomputes
/// `content-length` from the actual bytes.
pub fn strip_response_hop_by_hop(headers: &mut HeaderMap) {
    for name in HOP_BY_HOP.iter() {
        headers.remove(name);
    }
    headers.remove(hyper::header::CONTENT_LENGTH);
}

pub fn build_forwarded_headers(
    original: &HeaderMap,
    client_ip: &str,
    upstream: &Upstream,
) -> HeaderMap {
    let mut headers = original.clone();
    for name in HOP_BY_HOP.iter() {
        headers.remove(name);
    }

    // The upstream must see itself as the target, not the proxy's host.
    if let Ok(authority) = HeaderValue::from_str(upstream.authority()) {
        headers.insert("host", authority);
    }

    let chain = match headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        Some(existing) => format!("{existing}, {client_ip}"),
        None => client_ip.to_string(),
    };
    if let Ok(chain) = HeaderValue::from_str(&chain) {
        headers.insert("x-forwarded-for", chain);
    }

    headers.insert(PROXY_MARKER, HeaderValue::from_static("true"));
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upstream() -> Upstream {
        Upstream::parse("http://backend:9090").unwrap()
    }

    #[test]
    fn strips_hop_by_hop() {
        let mut original = HeaderMap::new();
        original.insert("connection", "keep-alive".parse().unwrap());
        original.insert("proxy-connection", "keep-alive".parse().unwrap());
        original.insert("transfer-encoding", "chunked".parse().unwrap());
        original.insert("content-type", "application/json".parse().unwrap());

        let result = build_forwarded_headers(&original, "10.0.0.1", &upstream());

        assert!(result.get("connection").is_none());
        assert!(result.get("proxy-connection").is_none());
        assert!(result.get("transfer-encoding").is_none());
        assert!(result.get("content-type").is_some());
    }

    #[test]
    fn rewrites_host() {
        let mut original = HeaderMap::new();
        original.insert("host", "app.example.com".parse().unwrap());

        let result = build_forwarded_headers(&original, "10.0.0.1", &upstream());

        assert_eq!(result.get("host").unwrap(), "backend:9090");
    }

    #[test]
    fn sets_x_forwarded_for_from_client_ip() {
        let result = build_forwarded_headers(&HeaderMap::new(), "10.0.0.1", &upstream());
        assert_eq!(result.get("x-forwarded-for").unwrap(), "10.0.0.1");
    }

    #[test]
    fn appends_x_forwarded_for() {
        let mut original = HeaderMap::new();
        original.insert("x-forwarded-for", "1.2.3.4".parse().unwrap());

        let result = build_forwarded_headers(&original, "10.0.0.1", &upstream());

        assert_eq!(result.get("x-forwarded-for").unwrap(), "1.2.3.4, 10.0.0.1");
    }

    #[test]
    fn sets_proxy_marker() {
        let result = build_forwarded_headers(&HeaderMap::new(), "10.0.0.1", &upstream());
        assert_eq!(result.get(PROXY_MARKER).unwrap(), "true");
    }

    #[test]
    fn response_strip_removes_hop_by_hop_and_content_length() {
        let mut headers = HeaderMap::new();
        headers.insert("connection", "close".parse().unwrap());
        headers.insert("upgrade", "h2c".parse().unwrap());
        headers.insert("content-length", "42".parse().unwrap());
        headers.insert("x-app", "ok".parse().unwrap());

        strip_response_hop_by_hop(&mut headers);

        assert!(headers.get("connection").is_none());
        assert!(headers.get("upgrade").is_none());
        assert!(headers.get("content-length").is_none());
        assert_eq!(headers.get("x-app").unwrap(), "ok");
    }
}
