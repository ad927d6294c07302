//! Folder management.

pub mod manager;
pub mod tree;

pub use manager::FolderManager;
