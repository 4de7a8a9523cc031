//! HTTP request/response tracing middleware.

use axum::http::{Request, header};
use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnResponse, MakeSpan, TraceLayer};
use tracing::{Level, Span};

/// Builds the `request` span. The `Host` header is recorded because it can
/// select the redirect on its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let host = request
            .headers()
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            host,
        )
    }
}

pub type HttpTraceLayer = TraceLayer<SharedClassifier<ServerErrorsAsFailures>, RequestSpan>;

/// Creates a tracing middleware for HTTP requests.
///
/// **On Request:** an `INFO` span with method, URI and host.
///
/// **On Response:** an `INFO` event with status and latency in microseconds
/// (redirects are answered from memory, milliseconds would read as zero).
///
/// # Example Logs
///
/// ```text
/// INFO request{method=GET uri=/docs host=go.example.com}: finished processing request latency=84 μs status=307
/// ```
pub fn layer() -> HttpTraceLayer {
    TraceLayer::new_for_http()
        .make_span_with(RequestSpan)
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Micros),
        )
}
