//! Request-scoped handle carrying the identity, transaction and path resolver.

use std::path::PathBuf;

use sqlx::{Sqlite, Transaction};

use cabinet_core::error::{AppError, ErrorKind};
use cabinet_core::identity::AuthenticatedUser;
use cabinet_core::result::AppResult;
use cabinet_database::repositories::{FileRepository, FolderRepository, TrashRepository};
use cabinet_entity::file::File;
use cabinet_entity::folder::Folder;

use crate::path::PathService;

/// Context for one storage operation.
///
/// Owns the operation's transaction. Repositories handed out by this
/// context are bound to the authenticated user, so every record query the
/// managers issue is ownership-scoped. Dropping the context without
/// calling [`commit`](Self::commit) rolls the transaction back.
#[derive(Debug)]
pub struct RequestContext {
    user: AuthenticatedUser,
    tx: Transaction<'static, Sqlite>,
    paths: PathService,
}

impl RequestContext {
    /// Creates a context for `user` around an open transaction.
    pub fn new(user: AuthenticatedUser, tx: Transaction<'static, Sqlite>, paths: PathService) -> Self {
        Self { user, tx, paths }
    }

    /// The acting user.
    pub fn user(&self) -> &AuthenticatedUser {
        &self.user
    }

    /// The acting user's id.
    pub fn user_id(&self) -> &str {
        self.user.id()
    }

    /// The path resolver.
    pub fn paths(&self) -> &PathService {
        &self.paths
    }

    /// Folder records of the acting user.
    pub fn folders(&mut self) -> FolderRepository<'_> {
        FolderRepository::new(&mut self.tx, self.user.id())
    }

    /// File records of the acting user.
    pub fn files(&mut self) -> FileRepository<'_> {
        FileRepository::new(&mut self.tx, self.user.id())
    }

    /// Deferred-deletion staging rows of the acting user.
    pub fn trash(&mut self) -> TrashRepository<'_> {
        TrashRepository::new(&mut self.tx, self.user.id())
    }

    /// Idempotently create the acting user's root directory.
    pub async fn ensure_root_exists(&self) -> AppResult<PathBuf> {
        self.paths.ensure_root_exists(&self.user).await
    }

    /// Look up an owned folder record.
    pub async fn resolve_folder(&mut self, folder_id: i64) -> AppResult<Folder> {
        self.paths.resolve_folder(&mut self.tx, &self.user, folder_id).await
    }

    /// Resolve a folder id (`None` = the user root) to its physical path.
    pub async fn resolve_folder_path(&mut self, folder_id: Option<i64>) -> AppResult<PathBuf> {
        self.paths
            .resolve_folder_path(&mut self.tx, &self.user, folder_id)
            .await
    }

    /// Look up an owned file record.
    pub async fn resolve_file(&mut self, file_id: &str) -> AppResult<File> {
        self.paths.resolve_file(&mut self.tx, &self.user, file_id).await
    }

    /// Resolve a file id to its physical path.
    pub async fn resolve_file_path(&mut self, file_id: &str) -> AppResult<PathBuf> {
        self.paths
            .resolve_file_path(&mut self.tx, &self.user, file_id)
            .await
    }

    /// Commit the operation's record changes.
    pub async fn commit(self) -> AppResult<()> {
        self.tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })
    }

    /// Discard the operation's record changes.
    pub async fn rollback(self) -> AppResult<()> {
        self.tx.rollback().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to roll back transaction", e)
        })
    }
}
