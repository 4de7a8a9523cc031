//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for the mapping source and local persistence.
//!
//! # Modules
//!
//! - [`persistence`] - Fallback snapshot file
//! - [`source`] - Data source implementations (CSV file)

pub mod persistence;
pub mod source;
