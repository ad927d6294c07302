//! # cabinet-entity
//!
//! Domain entity models for Cabinet. Every struct in this crate represents
//! a database table row or a domain value object. Database entities derive
//! `sqlx::FromRow`.

pub mod file;
pub mod folder;
pub mod name;
pub mod outcome;
pub mod trash;

pub use file::{CreateFile, File};
pub use folder::{CreateFolder, Folder, FolderNode};
pub use outcome::DeleteOutcome;
pub use trash::{CreateDeletedFile, DeletedFile};
