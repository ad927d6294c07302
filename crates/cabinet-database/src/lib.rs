//! # cabinet-database
//!
//! SQLite connection management, embedded migrations, and the owner-scoped
//! repositories that make up Cabinet's record store.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::{FileFilter, FileRepository, FolderFilter, FolderRepository, TrashRepository};
