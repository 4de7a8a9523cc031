//! Contract for the external provider of redirect mappings.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::mapping::Mapping;

/// Errors raised while pulling a mapping from a [`DataSource`].
///
/// Source errors are transient: the refresh pipeline records them in the
/// store's last-error slot and falls back to the snapshot file if one is
/// configured.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed source data: {0}")]
    Malformed(String),

    #[error("source did not answer within {0:?}")]
    Timeout(Duration),

    #[error("source unavailable: {0}")]
    Unavailable(String),
}

/// Provider of the redirect mapping and its change-detection metadata.
///
/// # Implementations
///
/// - [`crate::infrastructure::source::CsvDataSource`] - CSV file on disk
/// - Test mocks available with `cfg(test)`
///
/// # Timeouts
///
/// [`DataSource::fetch_mapping`] should bound its own network or disk work;
/// the refresh pipeline additionally wraps the call in a timeout so a stuck
/// source can never stall refreshes indefinitely.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Pulls the complete current mapping.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] when the source is unreachable or its data
    /// cannot be parsed.
    async fn fetch_mapping(&self) -> Result<Mapping, SourceError>;

    /// Whether the source changed since the last successful fetch.
    ///
    /// Implementations should answer `true` when they cannot tell.
    async fn needs_update(&self) -> bool;

    /// Time of the last successful fetch, if any.
    fn last_update(&self) -> Option<DateTime<Utc>>;

    /// Time the underlying data was last modified, if known.
    fn last_modified(&self) -> Option<DateTime<Utc>>;

    /// Provider-specific identifier shown in status views.
    fn id(&self) -> String;
}
