//! Periodic refresh loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::application::services::refresh_service::{RefreshOutcome, RefreshService};

/// Runs [`RefreshService::refresh`] every `period` until `shutdown` flips to
/// `true` or its sender is dropped.
///
/// The first tick fires one full period after start; the startup refresh is
/// expected to have run already. Failed cycles are logged and the loop keeps
/// going. Shutdown also interrupts a refresh that is still fetching.
pub async fn run_refresh_loop(
    service: Arc<RefreshService>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    info!(interval_secs = period.as_secs(), "Starting background updates");

    let mut ticker = time::interval_at(time::Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = shutdown_requested(&mut shutdown) => break,
            _ = ticker.tick() => {}
        }

        // An in-flight refresh is abandoned on shutdown.
        tokio::select! {
            _ = shutdown_requested(&mut shutdown) => break,
            result = service.refresh(false) => match result {
                Ok(RefreshOutcome::Skipped) => debug!("Scheduled refresh skipped"),
                Ok(RefreshOutcome::Published { size, origin }) => {
                    debug!(size, %origin, "Scheduled refresh published mapping");
                }
                Err(e) => warn!(error = %e, "Scheduled refresh failed"),
            },
        }
    }

    info!("Stopping background updates");
}

/// Resolves once `shutdown` holds `true` or its sender is gone.
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}
