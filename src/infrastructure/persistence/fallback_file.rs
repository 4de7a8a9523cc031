//! JSON snapshot of the last mapping fetched successfully from the source.
//!
//! The snapshot is a flat array of `{ "key": ..., "target": ... }` objects and
//! is the only state this service persists. It is rewritten after every
//! successful live fetch and read only when a live fetch fails.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::mapping::Mapping;

/// One redirect entry as stored in the snapshot file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackEntry {
    pub key: String,
    pub target: String,
}

/// Errors raised while reading or writing the snapshot file.
#[derive(Debug, thiserror::Error)]
pub enum FallbackError {
    #[error("fallback file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("fallback file {path} is malformed: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl FallbackError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn format(path: &Path, source: serde_json::Error) -> Self {
        Self::Format {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Converts a mapping into snapshot entries, sorted by key.
pub fn to_entries(mapping: &Mapping) -> Vec<FallbackEntry> {
    let mut entries: Vec<FallbackEntry> = mapping
        .iter()
        .map(|(key, target)| FallbackEntry {
            key: key.clone(),
            target: target.clone(),
        })
        .collect();
    entries.sort_by(|a, b| a.key.cmp(&b.key));
    entries
}

/// Converts snapshot entries back into a mapping; later duplicates win.
pub fn from_entries(entries: Vec<FallbackEntry>) -> Mapping {
    entries
        .into_iter()
        .map(|entry| (entry.key, entry.target))
        .collect()
}

/// Writes `mapping` to `path`.
///
/// An empty `path` disables the snapshot and is not an error. The parent
/// directory is created if needed and the content is written to a sibling
/// temporary file first, then renamed over the target, so readers never see
/// a half-written snapshot.
///
/// # Errors
///
/// Returns [`FallbackError::Io`] if the directory, temporary file or rename
/// fails, and [`FallbackError::Format`] if serialization fails.
pub async fn write_snapshot(path: &Path, mapping: &Mapping) -> Result<(), FallbackError> {
    if path.as_os_str().is_empty() {
        debug!("Fallback file path is empty, skipping write");
        return Ok(());
    }

    let bytes =
        serde_json::to_vec(&to_entries(mapping)).map_err(|e| FallbackError::format(path, e))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| FallbackError::io(parent, e))?;
    }

    let staging = staging_path(path);
    tokio::fs::write(&staging, &bytes)
        .await
        .map_err(|e| FallbackError::io(&staging, e))?;
    if let Err(e) = tokio::fs::rename(&staging, path).await {
        if let Err(cleanup) = tokio::fs::remove_file(&staging).await {
            debug!(path = %staging.display(), error = %cleanup, "Could not remove staging file");
        }
        return Err(FallbackError::io(path, e));
    }

    debug!(path = %path.display(), entries = mapping.len(), "Wrote fallback file");
    Ok(())
}

/// Reads a mapping back from the snapshot at `path`.
///
/// # Errors
///
/// Returns [`FallbackError::Io`] if the file is missing or unreadable and
/// [`FallbackError::Format`] if it is not a JSON array of entries.
pub async fn read_snapshot(path: &Path) -> Result<Mapping, FallbackError> {
    info!(path = %path.display(), "Reading fallback file");

    let data = tokio::fs::read(path)
        .await
        .map_err(|e| FallbackError::io(path, e))?;
    let entries: Vec<FallbackEntry> =
        serde_json::from_slice(&data).map_err(|e| FallbackError::format(path, e))?;

    Ok(from_entries(entries))
}

/// Like [`write_snapshot`], but only logs failures.
///
/// Returns whether the snapshot was written.
pub async fn write_snapshot_logged(path: &Path, mapping: &Mapping) -> bool {
    match write_snapshot(path, mapping).await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Error writing fallback file");
            false
        }
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
