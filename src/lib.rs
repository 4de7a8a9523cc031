//! # short-link
//!
//! A redirect service that serves a hot-swappable, in-memory mapping of short
//! paths and hostnames to destination URLs, built with Axum.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Mapping store, key normalization, hooks,
//!   the data source contract and the update queues
//! - **Application Layer** ([`application`]) - Refresh orchestration,
//!   scheduling and request resolution
//! - **Infrastructure Layer** ([`infrastructure`]) - CSV data source and the
//!   fallback snapshot file
//! - **API Layer** ([`api`]) - Redirect handler, status and admin endpoints
//! - **Web Layer** ([`web`]) - HTML pages and response headers
//!
//! ## Features
//!
//! - Whole-mapping atomic swaps; readers never see a partial update
//! - Periodic refresh that skips unchanged sources
//! - Fallback snapshot that keeps serving through source outages
//! - Hostname redirects, single-hop aliases and a root redirect
//! - `/<key>+` info pages, ETags and `Cache-Control`
//!
//! ## Quick Start
//!
//! ```bash
//! export SOURCE_FILE="./links.csv"
//! export FALLBACK_FILE="./data/fallback.json"  # Optional
//!
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod metrics;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;
pub mod web;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{
        MappingOrigin, RedirectResolver, RefreshError, RefreshOutcome, RefreshService,
        ResolverOptions,
    };
    pub use crate::domain::data_source::{DataSource, SourceError};
    pub use crate::domain::hooks::{HookChain, MappingHook};
    pub use crate::domain::keys::KeyOptions;
    pub use crate::domain::mapping::{Mapping, MappingStore};
    pub use crate::domain::update_worker::UpdateSender;
    pub use crate::error::AppError;
    pub use crate::routes::{RouteOptions, app_router};
    pub use crate::state::AppState;
    pub use crate::web::ResponseOptions;
}
