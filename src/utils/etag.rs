//! Strong ETags for redirect and info responses.

use sha2::{Digest, Sha256};

/// Number of hash bytes kept in an ETag.
pub const ETAG_LENGTH: usize = 8;

/// Builds a quoted ETag from a key, its target and the response kind
/// (`"redirect"` or `"info"`).
///
/// The tag changes whenever the target changes, so cached redirects are
/// revalidated after a mapping update.
pub fn redirect_etag(key: &str, target: &str, kind: &str) -> String {
    let hash = Sha256::digest(format!("{key}#{target}#{kind}").as_bytes());
    format!("\"{}\"", hex::encode(&hash[..ETAG_LENGTH]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_etag_format() {
        let etag = redirect_etag("docs", "https://example.com/docs", "redirect");

        assert_eq!(etag.len(), ETAG_LENGTH * 2 + 2);
        assert!(etag.starts_with('"') && etag.ends_with('"'));
        assert!(etag[1..etag.len() - 1].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_etag_is_stable() {
        assert_eq!(
            redirect_etag("docs", "https://example.com/docs", "redirect"),
            redirect_etag("docs", "https://example.com/docs", "redirect")
        );
    }

    #[test]
    fn test_etag_depends_on_every_part() {
        let base = redirect_etag("docs", "https://example.com/docs", "redirect");

        assert_ne!(base, redirect_etag("wiki", "https://example.com/docs", "redirect"));
        assert_ne!(base, redirect_etag("docs", "https://example.com/other", "redirect"));
        assert_ne!(base, redirect_etag("docs", "https://example.com/docs", "info"));
    }

    #[test]
    fn test_etag_known_value() {
        let expected = {
            let hash = Sha256::digest(b"a#b#c");
            format!("\"{}\"", hex::encode(&hash[..8]))
        };

        assert_eq!(redirect_etag("a", "b", "c"), expected);
    }
}
