//! Per-client rate limiting for the admin endpoints.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::PeerIpKeyExtractor,
};

/// Seconds needed to replenish one admin request.
pub const ADMIN_REPLENISH_SECS: u64 = 1;

/// Admin requests a single client may send back to back.
pub const ADMIN_BURST: u32 = 10;

pub type AdminRateLimitLayer =
    GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Limits `/_status/info` and `/_api/update-mapping` per peer IP.
///
/// A forced refresh re-reads the whole data source, so clients exceeding
/// [`ADMIN_BURST`] receive `429 Too Many Requests`. Requires the server to
/// provide `ConnectInfo<SocketAddr>`.
pub fn admin_layer() -> AdminRateLimitLayer {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(ADMIN_REPLENISH_SECS)
            .burst_size(ADMIN_BURST)
            .finish()
            .expect("admin rate limit quota is non-zero"),
    );

    GovernorLayer::new(governor_conf)
}
