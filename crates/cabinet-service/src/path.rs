//! Mapping between the logical hierarchy and physical paths.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use sqlx::SqliteConnection;
use tracing::debug;

use cabinet_core::error::AppError;
use cabinet_core::identity::AuthenticatedUser;
use cabinet_core::result::AppResult;
use cabinet_core::traits::storage::StorageProvider;
use cabinet_database::repositories::{FileFilter, FileRepository, FolderFilter, FolderRepository};
use cabinet_entity::file::File;
use cabinet_entity::folder::Folder;

/// Resolves folder and file ids to physical paths.
///
/// The stored path of a record is authoritative and returned verbatim; it
/// is never recomputed from the ancestor chain. Lookups only accept an
/// [`AuthenticatedUser`] and always filter by that user's id, so another
/// user's id resolves exactly like an id that does not exist.
#[derive(Debug, Clone)]
pub struct PathService {
    storage: Arc<dyn StorageProvider>,
}

impl PathService {
    /// Creates a path service over the given storage backend.
    pub fn new(storage: Arc<dyn StorageProvider>) -> Self {
        Self { storage }
    }

    /// The top-level storage directory.
    pub fn storage_root(&self) -> &Path {
        self.storage.root()
    }

    /// `<storage-root>/<user_id>`.
    pub fn user_root(&self, user: &AuthenticatedUser) -> PathBuf {
        self.storage.root().join(user.id())
    }

    /// Create the storage root and the user root if missing.
    ///
    /// Safe to race: an existing directory is not an error.
    pub async fn ensure_root_exists(&self, user: &AuthenticatedUser) -> AppResult<PathBuf> {
        let root = self.user_root(user);
        self.storage.ensure_dir(&root).await?;
        Ok(root)
    }

    /// Look up an owned folder, failing with `FolderNotFound`.
    pub async fn resolve_folder(
        &self,
        conn: &mut SqliteConnection,
        user: &AuthenticatedUser,
        folder_id: i64,
    ) -> AppResult<Folder> {
        let folder = FolderRepository::new(conn, user.id())
            .find_one(&FolderFilter::all().id(folder_id))
            .await?;
        debug!(user_id = %user.id(), folder_id, found = folder.is_some(), "Resolved folder");
        folder.ok_or_else(|| AppError::folder_not_found(folder_id))
    }

    /// Resolve a folder id to its directory; `None` is the user root.
    pub async fn resolve_folder_path(
        &self,
        conn: &mut SqliteConnection,
        user: &AuthenticatedUser,
        folder_id: Option<i64>,
    ) -> AppResult<PathBuf> {
        match folder_id {
            None => Ok(self.user_root(user)),
            Some(id) => self
                .resolve_folder(conn, user, id)
                .await
                .map(|folder| PathBuf::from(folder.folder_path)),
        }
    }

    /// Look up an owned file, failing with `FileNotFound`.
    pub async fn resolve_file(
        &self,
        conn: &mut SqliteConnection,
        user: &AuthenticatedUser,
        file_id: &str,
    ) -> AppResult<File> {
        let file = FileRepository::new(conn, user.id())
            .find_one(&FileFilter::all().id(file_id))
            .await?;
        debug!(user_id = %user.id(), file_id, found = file.is_some(), "Resolved file");
        file.ok_or_else(|| AppError::file_not_found(file_id))
    }

    /// Resolve a file id to its physical path.
    pub async fn resolve_file_path(
        &self,
        conn: &mut SqliteConnection,
        user: &AuthenticatedUser,
        file_id: &str,
    ) -> AppResult<PathBuf> {
        self.resolve_file(conn, user, file_id)
            .await
            .map(|file| PathBuf::from(file.file_path))
    }
}

/// Convert a physical path to the string stored in a record.
pub(crate) fn path_to_record(path: &Path) -> AppResult<String> {
    path.to_str()
        .map(str::to_string)
        .ok_or_else(|| AppError::validation(format!("Path {} is not valid UTF-8", path.display())))
}
