//! Deferred-deletion staging entities.

pub mod model;

pub use model::{CreateDeletedFile, DeletedFile};
