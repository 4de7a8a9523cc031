//! Hostname extraction from HTTP requests.

use axum::http::{HeaderMap, Uri, header};

/// Strips a port from a `Host` value.
///
/// Handles:
/// - IPv4 addresses (e.g., `192.168.1.1:8080`)
/// - IPv6 addresses (e.g., `[::1]:8080`, kept with brackets)
/// - Hostnames with or without ports (e.g., `go.example.com:3000`)
pub fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        match host.find(']') {
            Some(end_bracket) => &host[..=end_bracket],
            None => host,
        }
    } else {
        host.split(':').next().unwrap_or(host)
    }
}

/// Returns the request hostname without port.
///
/// Prefers the `Host` header and falls back to the URI authority (HTTP/2).
/// A missing or non-UTF-8 host yields an empty string, which simply never
/// matches a mapping key.
pub fn request_host(headers: &HeaderMap, uri: &Uri) -> String {
    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .or_else(|| uri.host())
        .unwrap_or_default();

    strip_port(host.trim()).to_string()
}
