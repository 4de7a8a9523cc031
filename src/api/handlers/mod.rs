//! HTTP request handlers.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod info;
pub mod redirect;
pub mod update_mapping;

pub use health::health_handler;
pub use info::info_handler;
pub use redirect::redirect_handler;
pub use update_mapping::update_mapping_handler;
