//! DTOs for the mapping info endpoint.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Snapshot of the live mapping and its source.
#[derive(Debug, Serialize)]
pub struct InfoResponse {
    /// Sorted by key.
    pub mapping: BTreeMap<String, String>,
    pub source_id: String,
    pub last_update: Option<DateTime<Utc>>,
    pub last_modified: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}
