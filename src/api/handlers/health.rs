//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::HealthResponse;
use crate::state::AppState;

/// Returns the state of the refresh pipeline.
///
/// # Endpoint
///
/// `GET /_status/health`
///
/// # Response Codes
///
/// - **200 OK**: last refresh succeeded and the update workers are running
/// - **503 Service Unavailable**: a refresh error is pending or a worker stopped
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "mapping_size": 42,
///   "running": true,
///   "healthy": true,
///   "last_update": "2024-05-01T12:00:00Z"
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let last_error = state.store.last_error();
    let running = state.updates.is_open();
    let healthy = last_error.is_none();
    let all_healthy = healthy && running;

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        mapping_size: state.store.size(),
        running,
        healthy,
        last_update: state.source().last_update(),
        last_error: last_error.map(|e| e.to_string()),
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}
