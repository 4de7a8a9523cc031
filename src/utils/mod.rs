//! Utility functions for request handling and response metadata.
//!
//! - [`host`] - Hostname extraction from HTTP requests
//! - [`etag`] - ETag computation for redirect responses
//! - [`flags`] - Boolean flag parsing

pub mod etag;
pub mod flags;
pub mod host;
