//! Per-request composition of identity, transaction and managers.

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, error, warn};

use cabinet_core::config::StorageConfig;
use cabinet_core::error::AppError;
use cabinet_core::identity::AuthenticatedUser;
use cabinet_core::result::AppResult;
use cabinet_core::traits::identity::IdentityResolver;
use cabinet_core::traits::storage::{ByteStream, StorageProvider};
use cabinet_database::DatabasePool;
use cabinet_entity::file::File;
use cabinet_entity::folder::{Folder, FolderNode};
use cabinet_entity::outcome::DeleteOutcome;
use cabinet_entity::trash::DeletedFile;

use crate::context::RequestContext;
use crate::file::{FileManager, TrashService, UploadTarget};
use crate::folder::FolderManager;
use crate::health::HealthReport;
use crate::path::PathService;

/// Entry point for token-authenticated storage operations.
///
/// Each call resolves the token, opens one transaction, runs the manager
/// operation against a fresh [`RequestContext`], and commits. Mutating
/// calls hold the database write lock for their whole transaction, so they
/// never fail on a stale read snapshot. An invalid token aborts the call
/// before any mutation. Unclassified failures are logged with the
/// operation, acting user and target before they are returned.
#[derive(Debug, Clone)]
pub struct StorageFacade {
    db: DatabasePool,
    identity: Arc<dyn IdentityResolver>,
    storage: Arc<dyn StorageProvider>,
    paths: PathService,
    folders: FolderManager,
    files: FileManager,
    trash: TrashService,
}

impl StorageFacade {
    /// Creates a facade over the given record store, identity resolver and
    /// storage backend.
    pub fn new(
        db: DatabasePool,
        identity: Arc<dyn IdentityResolver>,
        storage: Arc<dyn StorageProvider>,
        config: &StorageConfig,
    ) -> Self {
        Self {
            db,
            identity,
            paths: PathService::new(Arc::clone(&storage)),
            folders: FolderManager::new(Arc::clone(&storage)),
            files: FileManager::new(Arc::clone(&storage), config.max_upload_size_bytes),
            storage,
            trash: TrashService::new(config.trash_retention_hours),
        }
    }

    /// The path resolver shared by every request.
    pub fn paths(&self) -> &PathService {
        &self.paths
    }

    /// Probes the record store and the storage backend.
    pub async fn health_check(&self) -> AppResult<HealthReport> {
        let database = self.db.health_check().await?;
        let storage = self.storage.health_check().await?;
        Ok(HealthReport {
            database,
            storage,
            storage_provider: self.storage.provider_type().to_string(),
            storage_root: self.storage.root().to_path_buf(),
        })
    }

    /// Resolves `token` and opens a read-only request context.
    pub async fn begin(&self, token: &str) -> AppResult<RequestContext> {
        let user = self.identity.resolve(token).await?;
        self.open(user, Access::Read).await
    }

    /// Resolves `token` and opens a request context holding the write lock.
    pub async fn begin_write(&self, token: &str) -> AppResult<RequestContext> {
        let user = self.identity.resolve(token).await?;
        self.open(user, Access::Write).await
    }

    async fn open(&self, user: AuthenticatedUser, access: Access) -> AppResult<RequestContext> {
        let tx = match access {
            Access::Read => self.db.begin().await?,
            Access::Write => self.db.begin_immediate().await?,
        };
        debug!(user_id = %user.id(), ?access, "Request context opened");
        Ok(RequestContext::new(user, tx, self.paths.clone()))
    }

    /// Creates a folder under `parent_folder_id` (`None` = user root).
    pub async fn create_folder(
        &self,
        token: &str,
        name: &str,
        parent_folder_id: Option<i64>,
    ) -> AppResult<Folder> {
        let mut ctx = self.begin_write(token).await?;
        let user_id = ctx.user_id().to_string();

        let result = self.folders.create_folder(&mut ctx, name, parent_folder_id).await;
        let target = Child {
            parent: parent_folder_id,
            name,
        };
        self.settle(ctx, "create_folder", &user_id, target, result).await
    }

    /// Deletes a folder and everything below it.
    pub async fn delete_folder(&self, token: &str, folder_id: i64) -> AppResult<DeleteOutcome> {
        let mut ctx = self.begin_write(token).await?;
        let user_id = ctx.user_id().to_string();

        let result = self.folders.delete_folder(&mut ctx, folder_id).await;
        self.settle(ctx, "delete_folder", &user_id, folder_id, result).await
    }

    /// Lists direct child folders of `parent_folder_id`.
    pub async fn list_child_folders(
        &self,
        token: &str,
        parent_folder_id: Option<i64>,
    ) -> AppResult<Vec<Folder>> {
        let mut ctx = self.begin(token).await?;
        let user_id = ctx.user_id().to_string();

        let result = self.folders.list_child_folders(&mut ctx, parent_folder_id).await;
        self.settle(ctx, "list_child_folders", &user_id, Target(parent_folder_id), result)
            .await
    }

    /// Returns the caller's whole folder hierarchy.
    pub async fn folder_tree(&self, token: &str) -> AppResult<Vec<FolderNode>> {
        let mut ctx = self.begin(token).await?;
        let user_id = ctx.user_id().to_string();

        let result = self.folders.folder_tree(&mut ctx).await;
        self.settle(ctx, "folder_tree", &user_id, Target(None), result).await
    }

    /// Uploads a file into `folder_id` (`None` = user root).
    ///
    /// The target is resolved in a read transaction, the bytes are streamed
    /// with no transaction open, and the record is inserted under the write
    /// lock. The written file is removed again if any later step fails.
    pub async fn upload_file(
        &self,
        token: &str,
        stream: ByteStream,
        filename: &str,
        folder_id: Option<i64>,
    ) -> AppResult<File> {
        const OP: &str = "upload_file";
        let user = self.identity.resolve(token).await?;
        let user_id = user.id().to_string();

        let mut ctx = self.open(user.clone(), Access::Read).await?;
        let planned = self.files.plan_upload(&mut ctx, filename, folder_id).await;
        let target = Child {
            parent: folder_id,
            name: filename,
        };
        let planned: UploadTarget = self.settle(ctx, OP, &user_id, target, planned).await?;

        let size = self
            .files
            .store_upload(&planned, stream)
            .await
            .map_err(|e| report(OP, &user_id, &planned.path.display(), e))?;

        let result = match self.open(user, Access::Write).await {
            Ok(mut ctx) => {
                let recorded = self.files.record_upload(&mut ctx, &planned, size).await;
                self.settle(ctx, OP, &user_id, planned.path.display(), recorded)
                    .await
            }
            Err(e) => Err(report(OP, &user_id, &planned.path.display(), e)),
        };
        if result.is_err() {
            self.files.discard(&planned.path).await;
        }
        result
    }

    /// Resolves an owned file to its physical path.
    pub async fn get_file_path(&self, token: &str, file_id: &str) -> AppResult<PathBuf> {
        let mut ctx = self.begin(token).await?;
        let user_id = ctx.user_id().to_string();

        let result = self.files.get_file_path(&mut ctx, file_id).await;
        self.settle(ctx, "get_file_path", &user_id, file_id, result).await
    }

    /// Opens an owned file for streaming.
    pub async fn open_file(&self, token: &str, file_id: &str) -> AppResult<(File, ByteStream)> {
        let mut ctx = self.begin(token).await?;
        let user_id = ctx.user_id().to_string();

        let result = self.files.open_file(&mut ctx, file_id).await;
        self.settle(ctx, "open_file", &user_id, file_id, result).await
    }

    /// Lists file records directly inside `folder_id`.
    pub async fn list_files(&self, token: &str, folder_id: Option<i64>) -> AppResult<Vec<File>> {
        let mut ctx = self.begin(token).await?;
        let user_id = ctx.user_id().to_string();

        let result = self.files.list_files_in_folder(&mut ctx, folder_id).await;
        self.settle(ctx, "list_files", &user_id, Target(folder_id), result).await
    }

    /// Deletes an owned file.
    pub async fn delete_file(&self, token: &str, file_id: &str) -> AppResult<DeleteOutcome> {
        let mut ctx = self.begin_write(token).await?;
        let user_id = ctx.user_id().to_string();

        let result = self.files.delete_file(&mut ctx, file_id).await;
        self.settle(ctx, "delete_file", &user_id, file_id, result).await
    }

    /// Stars or unstars an owned file.
    pub async fn set_favorite(&self, token: &str, file_id: &str, favorite: bool) -> AppResult<File> {
        let mut ctx = self.begin_write(token).await?;
        let user_id = ctx.user_id().to_string();

        let result = self.files.set_favorite(&mut ctx, file_id, favorite).await;
        self.settle(ctx, "set_favorite", &user_id, file_id, result).await
    }

    /// Stages an owned file for deferred deletion.
    pub async fn stage_file(&self, token: &str, file_id: &str) -> AppResult<DeletedFile> {
        let mut ctx = self.begin_write(token).await?;
        let user_id = ctx.user_id().to_string();

        let result = self.trash.stage_file(&mut ctx, file_id).await;
        self.settle(ctx, "stage_file", &user_id, file_id, result).await
    }

    /// Restores a staged file.
    pub async fn restore_file(&self, token: &str, file_id: &str) -> AppResult<File> {
        let mut ctx = self.begin_write(token).await?;
        let user_id = ctx.user_id().to_string();

        let result = self.trash.restore_file(&mut ctx, file_id).await;
        self.settle(ctx, "restore_file", &user_id, file_id, result).await
    }

    /// Commits on success, rolls back on failure, and logs unclassified
    /// errors with full context.
    ///
    /// A folder created by a call whose commit fails is removed again so no
    /// directory outlives the failed request.
    async fn settle<T>(
        &self,
        ctx: RequestContext,
        op: &'static str,
        user_id: &str,
        target: impl Display,
        result: AppResult<T>,
    ) -> AppResult<T>
    where
        T: Settled,
    {
        match result {
            Ok(value) => match ctx.commit().await {
                Ok(()) => Ok(value),
                Err(e) => {
                    if let Some(path) = value.created_dir() {
                        self.folders.discard(path).await;
                    }
                    Err(report(op, user_id, &target, e))
                }
            },
            Err(e) => {
                if let Err(rollback) = ctx.rollback().await {
                    warn!(op, user_id, error = %rollback, "Rollback failed");
                }
                Err(report(op, user_id, &target, e))
            }
        }
    }
}

/// Values a facade call may return, with the directory it created (if any).
trait Settled {
    fn created_dir(&self) -> Option<&Path> {
        None
    }
}

impl Settled for Folder {
    fn created_dir(&self) -> Option<&Path> {
        Some(Path::new(&self.folder_path))
    }
}

impl Settled for File {}
impl Settled for UploadTarget {}
impl Settled for DeletedFile {}
impl Settled for DeleteOutcome {}
impl Settled for PathBuf {}
impl Settled for (File, ByteStream) {}
impl<T> Settled for Vec<T> {}

/// Which transaction a request context opens.
#[derive(Debug, Clone, Copy)]
enum Access {
    Read,
    Write,
}

/// Displays an optional folder id, with `root` for the user root.
struct Target(Option<i64>);

impl Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(id) => write!(f, "{id}"),
            None => write!(f, "root"),
        }
    }
}

/// Displays a new entry as `<parent id>/<name>`.
struct Child<'a> {
    parent: Option<i64>,
    name: &'a str,
}

impl Display for Child<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", Target(self.parent), self.name)
    }
}

fn report(op: &'static str, user_id: &str, target: &dyn Display, err: AppError) -> AppError {
    if err.is_unclassified() {
        error!(op, user_id, target = %target, error = %err, "Storage operation failed");
    } else {
        debug!(op, user_id, target = %target, error = %err, "Storage operation rejected");
    }
    err
}
