//! Application layer services.
//!
//! Services coordinate the domain primitives: the refresh pipeline pulls a
//! mapping from the data source and publishes it through the update queues,
//! the resolver answers lookups against the live store.
//!
//! # Available Services
//!
//! - [`services::refresh_service::RefreshService`] - One refresh cycle with fallback handling
//! - [`services::scheduler::run_refresh_loop`] - Periodic refresh driver
//! - [`services::resolver::RedirectResolver`] - Request path/host resolution

pub mod services;
