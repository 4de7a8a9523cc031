//! Refresh orchestration: source → hooks → snapshot → store.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::data_source::{DataSource, SourceError};
use crate::domain::hooks::HookChain;
use crate::domain::mapping::{Mapping, MappingStore};
use crate::domain::update_worker::{QueueClosed, UpdateSender};
use crate::infrastructure::persistence::fallback_file::{
    FallbackError, read_snapshot, write_snapshot_logged,
};
use crate::metrics;

/// Default bound on a single [`DataSource::fetch_mapping`] call.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Where a published mapping came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingOrigin {
    Source,
    Fallback,
}

impl MappingOrigin {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Fallback => "fallback",
        }
    }
}

impl fmt::Display for MappingOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a refresh cycle that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The source reported no change and the last cycle was healthy.
    Skipped,
    /// A new mapping is visible in the store.
    Published { size: usize, origin: MappingOrigin },
}

/// Refresh cycle failures. The published mapping is left unchanged in every case.
#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error("data source failed: {0}")]
    Source(#[source] Arc<SourceError>),

    #[error("data source failed ({source_error}) and the fallback file is unusable: {fallback}")]
    FallbackUnavailable {
        source_error: Arc<SourceError>,
        #[source]
        fallback: FallbackError,
    },

    #[error(transparent)]
    QueueClosed(#[from] QueueClosed),
}

/// Drives one refresh cycle at a time.
///
/// # Policy
///
/// - the snapshot is written only after a successful live fetch
/// - the snapshot is read only after a failed live fetch, and a mapping
///   restored from it is never written back
/// - the last error is cleared only by a successful live fetch
///
/// Cycles are serialized: a periodic tick and an administrative trigger
/// never run concurrently.
pub struct RefreshService {
    source: Arc<dyn DataSource>,
    store: Arc<MappingStore>,
    updates: UpdateSender,
    hooks: HookChain,
    fallback_file: Option<PathBuf>,
    fetch_timeout: Duration,
    cycle: Mutex<()>,
}

impl RefreshService {
    /// Creates a service without a fallback file and with
    /// [`DEFAULT_FETCH_TIMEOUT`].
    pub fn new(
        source: Arc<dyn DataSource>,
        store: Arc<MappingStore>,
        updates: UpdateSender,
        hooks: HookChain,
    ) -> Self {
        Self {
            source,
            store,
            updates,
            hooks,
            fallback_file: None,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            cycle: Mutex::new(()),
        }
    }

    /// Sets the snapshot path. `None` or an empty path disables it.
    pub fn with_fallback_file(mut self, path: Option<PathBuf>) -> Self {
        self.fallback_file = path.filter(|p| !p.as_os_str().is_empty());
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn source(&self) -> &Arc<dyn DataSource> {
        &self.source
    }

    pub fn store(&self) -> &Arc<MappingStore> {
        &self.store
    }

    pub fn updates(&self) -> &UpdateSender {
        &self.updates
    }

    /// Runs one refresh cycle.
    ///
    /// Unless `force` is set, the cycle is skipped when the source reports
    /// no change and no error is pending. On return with
    /// [`RefreshOutcome::Published`] the new mapping is already visible to
    /// readers.
    ///
    /// # Errors
    ///
    /// - [`RefreshError::Source`] - fetch failed and no fallback file is configured
    /// - [`RefreshError::FallbackUnavailable`] - fetch failed and the fallback file
    ///   could not be read
    /// - [`RefreshError::QueueClosed`] - the update workers have stopped
    pub async fn refresh(&self, force: bool) -> Result<RefreshOutcome, RefreshError> {
        let _cycle = self.cycle.lock().await;

        if !force && !self.source.needs_update().await && self.store.last_error().is_none() {
            debug!("Data source unchanged, skipping refresh");
            metrics::refresh::skipped();
            return Ok(RefreshOutcome::Skipped);
        }

        let result = match self.fetch().await {
            Ok(mapping) => self.publish_fresh(mapping).await,
            Err(e) => self.publish_fallback(Arc::new(e)).await,
        };

        match &result {
            Ok(RefreshOutcome::Published { size, origin }) => {
                metrics::refresh::published(origin.as_str(), *size);
            }
            Ok(RefreshOutcome::Skipped) => {}
            Err(e) => {
                warn!(error = %e, "Refresh failed, keeping current mapping");
                metrics::refresh::failed();
            }
        }

        result
    }

    async fn fetch(&self) -> Result<Mapping, SourceError> {
        match tokio::time::timeout(self.fetch_timeout, self.source.fetch_mapping()).await {
            Ok(result) => result,
            Err(_) => Err(SourceError::Timeout(self.fetch_timeout)),
        }
    }

    async fn publish_fresh(&self, mapping: Mapping) -> Result<RefreshOutcome, RefreshError> {
        self.updates.record_error(None).await?;

        let mapping = self.hooks.apply(mapping);
        if let Some(path) = &self.fallback_file {
            write_snapshot_logged(path, &mapping).await;
        }

        let size = mapping.len();
        self.updates.publish_mapping(mapping).await?;
        info!(size, "Published mapping from data source");

        Ok(RefreshOutcome::Published {
            size,
            origin: MappingOrigin::Source,
        })
    }

    async fn publish_fallback(
        &self,
        error: Arc<SourceError>,
    ) -> Result<RefreshOutcome, RefreshError> {
        warn!(error = %error, "Error fetching mapping from data source");
        self.updates.record_error(Some(error.clone())).await?;

        let Some(path) = &self.fallback_file else {
            return Err(RefreshError::Source(error));
        };

        let mapping = read_snapshot(path)
            .await
            .map_err(|fallback| RefreshError::FallbackUnavailable {
                source_error: error,
                fallback,
            })?;

        let mapping = self.hooks.apply(mapping);
        let size = mapping.len();
        self.updates.publish_mapping(mapping).await?;
        info!(size, path = %path.display(), "Published mapping from fallback file");

        Ok(RefreshOutcome::Published {
            size,
            origin: MappingOrigin::Fallback,
        })
    }
}

impl fmt::Debug for RefreshService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshService")
            .field("hooks", &self.hooks)
            .field("fallback_file", &self.fallback_file)
            .field("fetch_timeout", &self.fetch_timeout)
            .finish_non_exhaustive()
    }
}
