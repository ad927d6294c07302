//! # cabinet-service
//!
//! Business logic for Cabinet. The [`PathService`] maps folder and file
//! records to physical paths, the managers keep the physical tree and the
//! record store in lockstep, and the [`StorageFacade`] runs each operation
//! inside request-scoped transactions.
//!
//! Every manager method takes a [`RequestContext`], which can only be built
//! from an [`AuthenticatedUser`](cabinet_core::AuthenticatedUser); record
//! lookups are always scoped to that user.

pub mod context;
pub mod facade;
pub mod file;
pub mod folder;
pub mod health;
pub mod path;

pub use context::RequestContext;
pub use facade::StorageFacade;
pub use file::{FileManager, TrashService, UploadTarget};
pub use folder::FolderManager;
pub use health::HealthReport;
pub use path::PathService;
