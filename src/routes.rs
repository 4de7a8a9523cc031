//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /_status/health`          - Health check (when status is enabled)
//! - `GET  /_status/info`            - Live mapping (admin API)
//! - `GET|POST /_api/update-mapping` - Forced refresh (admin API)
//! - everything else                 - Redirect handler
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Timeout** - Requests are aborted after the configured duration
//! - **Rate limiting** - Per-IP token bucket on admin routes
//!
//! Trailing-slash normalization is applied around the router by
//! [`crate::server::run`].

use std::time::Duration;

use crate::api;
use crate::api::handlers::redirect_handler;
use crate::api::middleware::{rate_limit, tracing};
use crate::config::Config;
use crate::state::AppState;
use axum::Router;
use axum::http::StatusCode;
use tower_http::timeout::TimeoutLayer;

/// Which optional route groups are mounted.
#[derive(Debug, Clone, Copy)]
pub struct RouteOptions {
    pub status_enabled: bool,
    pub admin_api_enabled: bool,
    pub request_timeout: Duration,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            status_enabled: true,
            admin_api_enabled: false,
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl RouteOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            status_enabled: config.status_enabled,
            admin_api_enabled: config.admin_api_enabled,
            request_timeout: config.request_timeout(),
        }
    }
}

/// Constructs the application router with all routes and middleware.
///
/// Admin routes read the client IP from the socket peer address for rate
/// limiting, so the router must be served with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn app_router(state: AppState, options: RouteOptions) -> Router {
    let mut router = Router::new();

    if options.status_enabled {
        router = router.merge(api::routes::status_routes());
    }

    if options.admin_api_enabled {
        router = router.merge(api::routes::admin_routes().layer(rate_limit::admin_layer()));
    }

    router
        .fallback(redirect_handler)
        .with_state(state)
        .layer(timeout_layer(options.request_timeout))
        .layer(tracing::layer())
}

/// Aborts requests running longer than `timeout` with `408 Request Timeout`.
pub fn timeout_layer(timeout: Duration) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::get;
    use tower::ServiceExt;

    #[tokio::test(start_paused = true)]
    async fn test_slow_request_times_out() {
        let app = Router::new()
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    "late"
                }),
            )
            .layer(timeout_layer(Duration::from_secs(10)));

        let request = Request::builder().uri("/slow").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    }
}
