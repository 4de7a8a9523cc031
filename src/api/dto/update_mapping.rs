//! DTOs for the forced refresh endpoint.

use serde::Serialize;

/// Result of a forced refresh.
#[derive(Debug, Serialize)]
pub struct UpdateMappingResponse {
    pub message: String,
    pub mapping_size: usize,
    /// `source` or `fallback`.
    pub origin: &'static str,
}
