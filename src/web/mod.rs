//! HTML responses: not-found page, redirect info page and redirect body.
//!
//! # Modules
//!
//! - [`pages`] - Askama templates rendered from `templates/`
//! - [`response`] - Response builders applying the configured headers

pub mod pages;
pub mod response;

pub use response::ResponseOptions;
