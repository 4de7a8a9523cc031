//! HTTP server initialization and runtime setup.
//!
//! Handles worker spawning, the startup refresh, the periodic refresh loop
//! and the Axum server lifecycle.

use crate::application::services::{
    RedirectResolver, RefreshOutcome, RefreshService, run_refresh_loop,
};
use crate::config::Config;
use crate::domain::data_source::DataSource;
use crate::domain::hooks::HookChain;
use crate::domain::mapping::MappingStore;
use crate::domain::update_worker::UpdateSender;
use crate::infrastructure::source::CsvDataSource;
use crate::routes::{RouteOptions, app_router};
use crate::state::AppState;
use crate::web::ResponseOptions;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::watch;
use tower::Layer;
use tower_http::normalize_path::NormalizePathLayer;

/// Capacity of each update queue. Producers wait for every update to be
/// applied, so a handful of slots is plenty.
const UPDATE_QUEUE_CAPACITY: usize = 16;

/// Builds the refresh pipeline around `source`.
///
/// Spawns the two update workers; must be called inside a Tokio runtime.
pub fn build_refresh_service(config: &Config, source: Arc<dyn DataSource>) -> RefreshService {
    let store = Arc::new(MappingStore::new());
    let updates = UpdateSender::spawn(store.clone(), UPDATE_QUEUE_CAPACITY);

    RefreshService::new(
        source,
        store,
        updates,
        HookChain::standard(&config.key_options()),
    )
    .with_fallback_file(config.fallback_file.clone())
    .with_fetch_timeout(config.source_timeout())
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - CSV data source
/// - Mapping store and update workers
/// - Forced startup refresh (completes before the listener binds)
/// - Background refresh loop
/// - Axum HTTP server with graceful shutdown on Ctrl+C / SIGTERM
///
/// # Errors
///
/// Returns an error if:
/// - The startup refresh fails and no usable fallback file exists
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let source: Arc<dyn DataSource> = Arc::new(
        CsvDataSource::new(&config.source_file)
            .with_skip_header(config.source_skip_header)
            .with_check_modified(config.source_check_modified),
    );
    tracing::info!(source = %source.id(), "Data source configured");

    let refresh_service = Arc::new(build_refresh_service(&config, source));

    match refresh_service
        .refresh(true)
        .await
        .context("Initial mapping load failed")?
    {
        RefreshOutcome::Published { size, origin } => {
            tracing::info!(size, %origin, "Initial mapping loaded");
        }
        RefreshOutcome::Skipped => {}
    }

    let store = refresh_service.store().clone();
    let resolver = RedirectResolver::new(store.clone(), config.resolver_options());
    let updates = refresh_service.updates().clone();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler = tokio::spawn(run_refresh_loop(
        refresh_service.clone(),
        config.update_period(),
        shutdown_rx,
    ));

    let state = AppState::new(
        refresh_service,
        resolver,
        updates,
        ResponseOptions::from_config(&config),
    );

    let app = NormalizePathLayer::trim_trailing_slash()
        .layer(app_router(state, RouteOptions::from_config(&config)));

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    let _ = shutdown_tx.send(true);
    if let Err(e) = scheduler.await {
        tracing::warn!(error = %e, "Refresh loop ended abnormally");
    }
    tracing::info!("Server stopped");

    Ok(())
}

/// Resolves when Ctrl+C or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
