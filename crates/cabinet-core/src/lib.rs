//! # cabinet-core
//!
//! Core crate for Cabinet. Contains the unified error system, the
//! configuration schema, the authenticated identity type, and the traits
//! implemented by the storage and auth crates.
//!
//! This crate has **no** internal dependencies on other Cabinet crates.

pub mod config;
pub mod error;
pub mod identity;
pub mod result;
pub mod traits;

pub use error::{AppError, ErrorKind};
pub use identity::AuthenticatedUser;
pub use result::AppResult;
