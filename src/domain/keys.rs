//! Redirect key normalization.
//!
//! The same functions are used by the mapping hooks (when a fresh mapping is
//! prepared) and by the request resolver (when a path or host is turned into
//! a lookup key), so both sides always agree on what a key looks like.

/// Trailing marker that turns a redirect request into an info request
/// (`/docs+` shows information about `/docs` instead of redirecting).
pub const INFO_MARKER: char = '+';

/// Reserved key used when a request has neither a path nor a matching host.
pub const ROOT_REDIRECT_KEY: &str = "__root";

/// Options controlling how keys are normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyOptions {
    /// Case-fold keys and request paths.
    pub ignore_case: bool,
    /// Info pages are available; keys are stored without the info marker.
    pub info_enabled: bool,
}

impl Default for KeyOptions {
    fn default() -> Self {
        Self {
            ignore_case: true,
            info_enabled: true,
        }
    }
}

/// Strips leading and trailing slashes.
pub fn trim_slashes(raw: &str) -> &str {
    raw.trim_matches('/')
}

/// Strips a trailing run of info markers together with any slashes they
/// expose, so `docs+`, `docs/+` and `docs++` all become `docs`.
pub fn strip_info_marker(key: &str) -> &str {
    key.trim_end_matches([INFO_MARKER, '/'])
}

/// Whether `key` carries the info marker.
pub fn has_info_marker(key: &str) -> bool {
    key.ends_with(INFO_MARKER)
}

/// Case-folds `key` if the options ask for it.
pub fn fold_case(key: &str, options: &KeyOptions) -> String {
    if options.ignore_case {
        key.to_lowercase()
    } else {
        key.to_string()
    }
}

/// Normalizes a raw request path, hostname or alias target into a lookup key.
///
/// Returns the key and whether the raw value carried the info marker. The
/// marker is always stripped from the key, whether or not info pages are
/// enabled.
pub fn normalize_key(raw: &str, options: &KeyOptions) -> (String, bool) {
    let folded = fold_case(trim_slashes(raw), options);
    if has_info_marker(&folded) {
        (strip_info_marker(&folded).to_string(), true)
    } else {
        (folded, false)
    }
}

/// Whether a mapping target is an absolute URL rather than an alias for
/// another key.
pub fn is_absolute_target(target: &str) -> bool {
    target.starts_with("http")
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOLD: KeyOptions = KeyOptions {
        ignore_case: true,
        info_enabled: true,
    };

    const KEEP_CASE: KeyOptions = KeyOptions {
        ignore_case: false,
        info_enabled: true,
    };

    #[test]
    fn test_normalize_plain_path() {
        assert_eq!(normalize_key("/docs", &FOLD), ("docs".to_string(), false));
        assert_eq!(normalize_key("/docs/", &FOLD), ("docs".to_string(), false));
        assert_eq!(normalize_key("docs", &FOLD), ("docs".to_string(), false));
    }

    #[test]
    fn test_normalize_nested_path_keeps_inner_slashes() {
        assert_eq!(
            normalize_key("/team/docs/", &FOLD),
            ("team/docs".to_string(), false)
        );
    }

    #[test]
    fn test_normalize_case_folding() {
        assert_eq!(normalize_key("/Docs", &FOLD), ("docs".to_string(), false));
        assert_eq!(
            normalize_key("/Docs", &KEEP_CASE),
            ("Docs".to_string(), false)
        );
    }

    #[test]
    fn test_normalize_info_marker() {
        assert_eq!(normalize_key("/docs+", &FOLD), ("docs".to_string(), true));
        assert_eq!(normalize_key("/docs+/", &FOLD), ("docs".to_string(), true));
        assert_eq!(normalize_key("/docs/+", &FOLD), ("docs".to_string(), true));
        assert_eq!(normalize_key("/docs++", &FOLD), ("docs".to_string(), true));
    }

    #[test]
    fn test_normalize_marker_in_the_middle_is_kept() {
        assert_eq!(normalize_key("/c++/ref", &FOLD), ("c++/ref".to_string(), false));
    }

    #[test]
    fn test_normalize_empty_and_root() {
        assert_eq!(normalize_key("/", &FOLD), (String::new(), false));
        assert_eq!(normalize_key("", &FOLD), (String::new(), false));
        assert_eq!(normalize_key("/+", &FOLD), (String::new(), true));
    }

    #[test]
    fn test_normalize_hostname() {
        assert_eq!(
            normalize_key("Go.Example.com", &FOLD),
            ("go.example.com".to_string(), false)
        );
    }

    #[test]
    fn test_is_absolute_target() {
        assert!(is_absolute_target("https://example.com"));
        assert!(is_absolute_target("http://example.com"));
        assert!(!is_absolute_target("docs"));
        assert!(!is_absolute_target("go.example.com"));
    }
}
