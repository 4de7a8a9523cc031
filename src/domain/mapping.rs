//! Redirect mapping and the shared, hot-swappable store that serves it.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::domain::data_source::SourceError;

/// Key → target table served to clients.
///
/// Keys are the (normalized) redirect paths or hostnames, targets are
/// absolute URLs or aliases pointing at another key.
pub type Mapping = HashMap<String, String>;

/// Most recent refresh failure, shared between the store and status views.
pub type LastError = Option<Arc<SourceError>>;

/// Authoritative, concurrency-safe holder of the live [`Mapping`].
///
/// The mapping is only ever replaced wholesale via [`MappingStore::update_mapping`],
/// which is called exclusively by the mapping worker
/// (see [`crate::domain::update_worker`]). Readers therefore observe either the
/// previous or the next generation in its entirety.
///
/// The last-error slot has its own lock so error bookkeeping never blocks
/// lookups.
#[derive(Debug, Default)]
pub struct MappingStore {
    current: RwLock<Mapping>,
    last_error: RwLock<LastError>,
}

impl MappingStore {
    /// Creates a store with an empty mapping and no recorded error.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the target for `key` under a shared read lock.
    pub fn get_target(&self, key: &str) -> Option<String> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Replaces the live mapping.
    ///
    /// The previous generation is dropped after the write lock is released.
    pub fn update_mapping(&self, mapping: Mapping) {
        let previous = {
            let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *current, mapping)
        };
        drop(previous);
    }

    /// Returns a deep copy of the live mapping.
    pub fn current_mapping(&self) -> Mapping {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of entries in the live mapping.
    pub fn size(&self) -> usize {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn last_error(&self) -> LastError {
        self.last_error
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_last_error(&self, error: LastError) {
        *self.last_error.write().unwrap_or_else(PoisonError::into_inner) = error;
    }
}
