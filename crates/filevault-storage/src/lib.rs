//! # filevault-storage
//!
//! Object store implementations for FileVault: a local filesystem store
//! and an in-memory store, plus a factory selecting one from configuration.

pub mod factory;
pub mod providers;

pub use factory::build_object_store;
pub use providers::{LocalObjectStore, MemoryObjectStore};
