//! Status and administrative route groups.

use crate::api::handlers::{health_handler, info_handler, update_mapping_handler};
use crate::state::AppState;
use axum::{Router, routing::get};

/// Public status routes.
///
/// # Endpoints
///
/// - `GET /_status/health` - Refresh pipeline health
pub fn status_routes() -> Router<AppState> {
    Router::new().route("/_status/health", get(health_handler))
}

/// Administrative routes. They carry no authentication of their own.
///
/// # Endpoints
///
/// - `GET      /_status/info`        - Live mapping and source metadata
/// - `GET|POST /_api/update-mapping` - Forced refresh
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/_status/info", get(info_handler))
        .route(
            "/_api/update-mapping",
            get(update_mapping_handler).post(update_mapping_handler),
        )
}
