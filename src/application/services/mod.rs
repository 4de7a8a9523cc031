//! Services of the refresh pipeline and request path.

pub mod refresh_service;
pub mod resolver;
pub mod scheduler;

pub use refresh_service::{MappingOrigin, RefreshError, RefreshOutcome, RefreshService};
pub use resolver::{ParsedRequest, RedirectResolver, ResolverOptions};
pub use scheduler::run_refresh_loop;
