//! Data Transfer Objects for the status and admin endpoints.

pub mod health;
pub mod info;
pub mod update_mapping;
