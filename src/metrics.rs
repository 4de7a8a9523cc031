//! Counters emitted by the redirect and refresh paths.
//!
//! Recording is a no-op until a recorder is installed by the embedding
//! process.

/// Redirect handler outcomes.
pub mod redirects {
    pub fn found() {
        ::metrics::counter!("short_link_redirects_total", "outcome" => "found").increment(1);
    }

    pub fn info() {
        ::metrics::counter!("short_link_redirects_total", "outcome" => "info").increment(1);
    }

    pub fn not_found() {
        ::metrics::counter!("short_link_redirects_total", "outcome" => "not_found").increment(1);
    }
}

/// Refresh cycle outcomes.
pub mod refresh {
    pub fn skipped() {
        ::metrics::counter!("short_link_refresh_total", "outcome" => "skipped").increment(1);
    }

    pub fn published(origin: &'static str, size: usize) {
        ::metrics::counter!("short_link_refresh_total", "outcome" => "published", "origin" => origin)
            .increment(1);
        ::metrics::gauge!("short_link_mapping_entries").set(size as f64);
    }

    pub fn failed() {
        ::metrics::counter!("short_link_refresh_total", "outcome" => "failed").increment(1);
    }
}
