//! Domain layer: the redirect mapping and everything that keeps it current.
//!
//! This module has no knowledge of HTTP or of any concrete data provider.
//!
//! # Architecture
//!
//! - [`mapping`] - The [`mapping::Mapping`] type and the shared [`mapping::MappingStore`]
//! - [`keys`] - Key normalization shared by hooks and request resolution
//! - [`hooks`] - Transforms applied to each freshly fetched mapping
//! - [`data_source`] - The [`data_source::DataSource`] trait implemented by providers
//! - [`update_worker`] - Queue workers serializing writes into the store
//!
//! # Update Flow
//!
//! 1. The refresh service fetches a mapping from a [`data_source::DataSource`]
//! 2. The [`hooks::HookChain`] normalizes its keys
//! 3. The mapping is pushed onto the mapping queue
//! 4. [`update_worker::run_mapping_worker`] swaps it into the store

pub mod data_source;
pub mod hooks;
pub mod keys;
pub mod mapping;
pub mod update_worker;
