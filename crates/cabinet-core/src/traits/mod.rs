//! Core traits defined in `cabinet-core` and implemented by other crates.

pub mod identity;
pub mod storage;

pub use identity::IdentityResolver;
pub use storage::{ByteStream, StorageProvider};
