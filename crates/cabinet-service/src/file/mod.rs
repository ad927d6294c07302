//! File management and deferred-deletion staging.

pub mod manager;
pub mod trash;

pub use manager::{FileManager, UploadTarget};
pub use trash::TrashService;
