//! Transforms applied to every freshly fetched mapping before it is published.

use crate::domain::keys::{self, KeyOptions};
use crate::domain::mapping::Mapping;
use std::fmt;

/// A pure `Mapping → Mapping` transform.
///
/// Hooks are total: an entry that cannot be transformed meaningfully is left
/// unchanged. When a hook rewrites two keys to the same value, the later
/// write wins.
///
/// Plain closures implement this trait, so ad-hoc hooks can be registered
/// without a dedicated type.
pub trait MappingHook: Send + Sync {
    fn apply(&self, mapping: Mapping) -> Mapping;

    /// Short name used in logs.
    fn name(&self) -> &str {
        "custom"
    }
}

impl<F> MappingHook for F
where
    F: Fn(Mapping) -> Mapping + Send + Sync,
{
    fn apply(&self, mapping: Mapping) -> Mapping {
        self(mapping)
    }
}

/// Rewrites every key with `modify`, keeping targets untouched.
fn rewrite_keys(mapping: Mapping, modify: impl Fn(&str) -> String) -> Mapping {
    let mut rewritten = Mapping::with_capacity(mapping.len());
    for (key, target) in mapping {
        rewritten.insert(modify(&key), target);
    }
    rewritten
}

/// Strips leading and trailing slashes from keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrimSlashes;

impl MappingHook for TrimSlashes {
    fn apply(&self, mapping: Mapping) -> Mapping {
        rewrite_keys(mapping, |key| keys::trim_slashes(key).to_string())
    }

    fn name(&self) -> &str {
        "trim-slashes"
    }
}

/// Removes the info-request marker from keys so `docs+` is stored as `docs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StripInfoMarker;

impl MappingHook for StripInfoMarker {
    fn apply(&self, mapping: Mapping) -> Mapping {
        rewrite_keys(mapping, |key| keys::strip_info_marker(key).to_string())
    }

    fn name(&self) -> &str {
        "strip-info-marker"
    }
}

/// Lower-cases keys for case-insensitive lookups.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowercaseKeys;

impl MappingHook for LowercaseKeys {
    fn apply(&self, mapping: Mapping) -> Mapping {
        rewrite_keys(mapping, str::to_lowercase)
    }

    fn name(&self) -> &str {
        "lowercase-keys"
    }
}

/// Ordered, append-only list of [`MappingHook`]s.
///
/// Built once at startup and then owned by
/// [`crate::application::services::RefreshService`]; there is no way to
/// remove a hook.
#[derive(Default)]
pub struct HookChain {
    hooks: Vec<Box<dyn MappingHook>>,
}

impl HookChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// The default chain: trim slashes, then strip the info marker (only
    /// when info pages are enabled), then lower-case (only when case is
    /// ignored).
    pub fn standard(options: &KeyOptions) -> Self {
        let mut chain = Self::new();
        chain.add_hook(TrimSlashes);
        if options.info_enabled {
            chain.add_hook(StripInfoMarker);
        }
        if options.ignore_case {
            chain.add_hook(LowercaseKeys);
        }
        chain
    }

    /// Appends a hook; hooks run in registration order.
    pub fn add_hook(&mut self, hook: impl MappingHook + 'static) {
        tracing::debug!(hook = hook.name(), "Registering mapping hook");
        self.hooks.push(Box::new(hook));
    }

    pub fn hooks(&self) -> &[Box<dyn MappingHook>] {
        &self.hooks
    }

    /// Feeds `mapping` through every hook in order.
    pub fn apply(&self, mapping: Mapping) -> Mapping {
        self.hooks
            .iter()
            .fold(mapping, |current, hook| hook.apply(current))
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl fmt::Debug for HookChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.hooks.iter().map(|hook| hook.name()))
            .finish()
    }
}
