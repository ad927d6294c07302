//! # cabinet-storage
//!
//! Physical storage provider implementations for Cabinet. The local
//! filesystem provider is the only backend.

pub mod providers;

pub use providers::LocalStorageProvider;
