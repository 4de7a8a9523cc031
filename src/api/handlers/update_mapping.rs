//! Handler for the forced refresh endpoint.

use axum::{Json, extract::State};
use tracing::info;

use crate::api::dto::update_mapping::UpdateMappingResponse;
use crate::application::services::RefreshOutcome;
use crate::error::AppError;
use crate::state::AppState;

/// Runs a forced refresh and waits until the result is visible.
///
/// # Endpoint
///
/// `GET|POST /_api/update-mapping` (admin API only)
///
/// # Errors
///
/// Returns 503 if the source failed and no usable fallback exists, and 500
/// if the update workers have stopped. The live mapping is unchanged in both
/// cases.
pub async fn update_mapping_handler(
    State(state): State<AppState>,
) -> Result<Json<UpdateMappingResponse>, AppError> {
    info!("Forced mapping update requested");

    let (mapping_size, origin) = match state.refresh_service.refresh(true).await? {
        RefreshOutcome::Published { size, origin } => (size, origin.as_str()),
        RefreshOutcome::Skipped => (state.store.size(), "unchanged"),
    };

    Ok(Json(UpdateMappingResponse {
        message: format!("Update OK, mapping size: {mapping_size}"),
        mapping_size,
        origin,
    }))
}
