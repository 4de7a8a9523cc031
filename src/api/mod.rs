//! HTTP API layer: redirect handler, status and admin endpoints.
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for JSON responses
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Rate limiting and request tracing
//! - [`routes`] - Route groups

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
