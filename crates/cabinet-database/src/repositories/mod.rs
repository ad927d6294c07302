//! Owner-scoped repositories for Cabinet entities.
//!
//! Every repository borrows the connection of the caller's transaction and
//! is bound to one owner id at construction; each statement it issues is
//! filtered by that owner. There is no way to query across users.

pub mod file;
pub mod folder;
pub mod trash;

pub use file::{FileFilter, FileRepository};
pub use folder::{FolderFilter, FolderRepository};
pub use trash::TrashRepository;
