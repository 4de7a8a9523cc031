//! Request resolution: raw path and host → redirect target.

use std::sync::Arc;

use axum::http::Method;

use crate::domain::keys::{self, KeyOptions, ROOT_REDIRECT_KEY};
use crate::domain::mapping::MappingStore;

/// Switches that change how requests are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverOptions {
    pub keys: KeyOptions,
    /// Fall back to the `__root` key for requests without a path.
    pub allow_root_redirect: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            keys: KeyOptions::default(),
            allow_root_redirect: true,
        }
    }
}

/// Outcome of resolving one request against the live mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRequest {
    pub original_path: String,
    /// Key that was looked up last (the alias key when an alias was followed).
    pub normalized_key: String,
    pub target: Option<String>,
    pub info_request: bool,
    /// HEAD and OPTIONS responses never carry a body.
    pub no_body: bool,
}

impl ParsedRequest {
    pub fn is_found(&self) -> bool {
        self.target.is_some()
    }
}

/// Turns requests into lookups against the [`MappingStore`].
#[derive(Debug, Clone)]
pub struct RedirectResolver {
    store: Arc<MappingStore>,
    options: ResolverOptions,
}

impl RedirectResolver {
    pub fn new(store: Arc<MappingStore>, options: ResolverOptions) -> Self {
        Self { store, options }
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Resolves a decoded request path and the request hostname. A port on
    /// the hostname is ignored.
    ///
    /// # Algorithm
    ///
    /// 1. Normalize the path and detect the info marker
    /// 2. Use the hostname as key when the path is empty
    /// 3. Look the key up
    /// 4. Follow an alias (target not starting with `http`) exactly once
    /// 5. Fall back to `__root` for empty paths when allowed
    pub fn resolve(&self, path: &str, host: &str, method: &Method) -> ParsedRequest {
        let key_options = &self.options.keys;

        let (path_key, info_request) = keys::normalize_key(path, key_options);
        let path_empty = path_key.is_empty();

        let mut key = if path_empty {
            keys::normalize_key(crate::utils::host::strip_port(host), key_options).0
        } else {
            path_key
        };

        let mut target = self.store.get_target(&key);

        let alias_key = target
            .as_deref()
            .filter(|t| !keys::is_absolute_target(t))
            .map(|alias| keys::normalize_key(alias, key_options).0);
        if let Some(alias_key) = alias_key {
            target = self.store.get_target(&alias_key);
            key = alias_key;
        }

        if target.is_none() && path_empty && self.options.allow_root_redirect {
            target = self.store.get_target(ROOT_REDIRECT_KEY);
        }

        ParsedRequest {
            original_path: path.to_string(),
            normalized_key: key,
            target,
            info_request: info_request && key_options.info_enabled,
            no_body: *method == Method::HEAD || *method == Method::OPTIONS,
        }
    }
}
