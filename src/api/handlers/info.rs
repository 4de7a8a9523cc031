//! Handler for the mapping info endpoint.

use axum::{Json, extract::State};

use crate::api::dto::info::InfoResponse;
use crate::state::AppState;

/// Returns a copy of the live mapping with source metadata.
///
/// # Endpoint
///
/// `GET /_status/info` (admin API only)
pub async fn info_handler(State(state): State<AppState>) -> Json<InfoResponse> {
    let source = state.source();

    Json(InfoResponse {
        mapping: state.store.current_mapping().into_iter().collect(),
        source_id: source.id(),
        last_update: source.last_update(),
        last_modified: source.last_modified(),
        last_error: state.store.last_error().map(|e| e.to_string()),
    })
}
