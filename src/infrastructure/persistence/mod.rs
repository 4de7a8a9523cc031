//! Local persistence.
//!
//! The only persisted state is the fallback snapshot of the last mapping
//! fetched successfully from the data source.

pub mod fallback_file;

pub use fallback_file::{FallbackEntry, FallbackError, read_snapshot, write_snapshot};
