//! Folder creation and deletion, keeping directories and records in lockstep.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use cabinet_core::error::{AppError, ErrorKind};
use cabinet_core::result::AppResult;
use cabinet_core::traits::storage::StorageProvider;
use cabinet_database::repositories::FolderFilter;
use cabinet_entity::folder::{CreateFolder, Folder};
use cabinet_entity::name::validate_name;
use cabinet_entity::outcome::DeleteOutcome;

use crate::context::RequestContext;
use crate::path::path_to_record;

/// Creates, deletes and lists folders.
///
/// A directory is always created before its record is inserted and removed
/// before its record is deleted, so a committed folder record always has a
/// directory behind it. An orphan directory without a record is tolerated.
#[derive(Debug, Clone)]
pub struct FolderManager {
    storage: Arc<dyn StorageProvider>,
}

impl FolderManager {
    /// Creates a new folder manager.
    pub fn new(storage: Arc<dyn StorageProvider>) -> Self {
        Self { storage }
    }

    /// Creates a folder named `name` under `parent_folder_id` (`None` = user root).
    ///
    /// The exclusive `mkdir` is the linearization point between concurrent
    /// creators of the same name: exactly one succeeds, the others fail with
    /// `FolderAlreadyExists`.
    pub async fn create_folder(
        &self,
        ctx: &mut RequestContext,
        name: &str,
        parent_folder_id: Option<i64>,
    ) -> AppResult<Folder> {
        validate_name(name)?;
        ctx.ensure_root_exists().await?;

        let parent_path = ctx.resolve_folder_path(parent_folder_id).await?;
        let path = parent_path.join(name);
        let record = CreateFolder {
            folder_name: name.to_string(),
            folder_path: path_to_record(&path)?,
            parent_folder_id,
        };

        self.storage.create_dir(&path).await?;

        let folder = match ctx.folders().add(&record).await {
            Ok(folder) => folder,
            // A record already claims this path; the directory we just made
            // now backs it, so leave it in place.
            Err(e) if e.kind == ErrorKind::FolderAlreadyExists => return Err(e),
            Err(e) => {
                self.discard(&path).await;
                return Err(e);
            }
        };

        info!(
            user_id = %ctx.user_id(),
            folder_id = folder.id,
            parent_folder_id = ?folder.parent_folder_id,
            path = %folder.folder_path,
            "Folder created"
        );

        Ok(folder)
    }

    /// Deletes a folder, its directory tree, and (by cascade) every
    /// descendant folder and file record.
    ///
    /// Returns `NotFound` when the caller owns no such folder, and
    /// `AlreadyGone` when the record existed but its directory did not.
    /// Fails with `Conflict` if any file below the folder is staged for
    /// deferred deletion.
    pub async fn delete_folder(
        &self,
        ctx: &mut RequestContext,
        folder_id: i64,
    ) -> AppResult<DeleteOutcome> {
        let folder = match ctx.resolve_folder(folder_id).await {
            Ok(folder) => folder,
            Err(e) if e.is_not_found() => {
                debug!(user_id = %ctx.user_id(), folder_id, "Folder already absent");
                return Ok(DeleteOutcome::NotFound);
            }
            Err(e) => return Err(e),
        };

        let now = Utc::now();
        let staged = ctx.trash().find_under_folder(folder_id).await?;
        if let Some(live) = staged.iter().find(|d| d.is_live(now)) {
            return Err(AppError::conflict(format!(
                "Folder {folder_id} contains file {} staged for deletion until {}",
                live.file_id, live.expires_at
            )));
        }

        let path = PathBuf::from(&folder.folder_path);
        let removed = self.storage.remove_dir_all(&path).await?;
        if !removed {
            warn!(
                user_id = %ctx.user_id(),
                folder_id,
                path = %folder.folder_path,
                "Folder record had no directory on disk"
            );
        }

        ctx.folders()
            .delete(&FolderFilter::all().id(folder_id))
            .await?;

        info!(
            user_id = %ctx.user_id(),
            folder_id,
            path = %folder.folder_path,
            "Folder deleted"
        );

        Ok(if removed {
            DeleteOutcome::Deleted
        } else {
            DeleteOutcome::AlreadyGone
        })
    }

    /// Lists the direct children of `parent_folder_id` (`None` = user root),
    /// in creation order. Fails with `FolderNotFound` for an unowned parent.
    pub async fn list_child_folders(
        &self,
        ctx: &mut RequestContext,
        parent_folder_id: Option<i64>,
    ) -> AppResult<Vec<Folder>> {
        if let Some(parent) = parent_folder_id {
            ctx.resolve_folder(parent).await?;
        }
        ctx.folders()
            .find_all(&FolderFilter::all().parent(parent_folder_id))
            .await
    }

    /// Best-effort removal of a directory created by a failed operation.
    pub(crate) async fn discard(&self, path: &std::path::Path) {
        if let Err(e) = self.storage.remove_dir_all(path).await {
            warn!(path = %path.display(), error = %e, "Failed to remove orphan directory");
        }
    }
}
