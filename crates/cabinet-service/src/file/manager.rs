//! File upload, retrieval and deletion, keeping files and records in lockstep.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use cabinet_core::error::{AppError, ErrorKind};
use cabinet_core::result::AppResult;
use cabinet_core::traits::storage::{ByteStream, StorageProvider};
use cabinet_database::repositories::FileFilter;
use cabinet_entity::file::{CreateFile, File};
use cabinet_entity::name::split_filename;
use cabinet_entity::outcome::DeleteOutcome;

use crate::context::RequestContext;
use crate::path::path_to_record;

/// Where an accepted upload will be written.
#[derive(Debug, Clone)]
pub struct UploadTarget {
    /// Destination folder (`None` = user root).
    pub folder_id: Option<i64>,
    /// Base name, without the extension.
    pub file_name: String,
    /// Extension after the last dot.
    pub file_extension: String,
    /// `path` as stored in the record.
    pub file_path: String,
    /// Absolute physical path.
    pub path: PathBuf,
}

/// Uploads, serves and deletes files.
///
/// Bytes are fully written and synced before the record is inserted, and a
/// partial file is removed if the write fails, so a record never points at
/// a missing or truncated file.
#[derive(Debug, Clone)]
pub struct FileManager {
    storage: Arc<dyn StorageProvider>,
    max_upload_size_bytes: u64,
}

impl FileManager {
    /// Creates a new file manager.
    pub fn new(storage: Arc<dyn StorageProvider>, max_upload_size_bytes: u64) -> Self {
        Self {
            storage,
            max_upload_size_bytes,
        }
    }

    /// Validates `filename` and resolves where it will be written inside
    /// `folder_id` (`None` = user root). The filename is split at its last dot.
    pub async fn plan_upload(
        &self,
        ctx: &mut RequestContext,
        filename: &str,
        folder_id: Option<i64>,
    ) -> AppResult<UploadTarget> {
        let (file_name, file_extension) = split_filename(filename)?;
        ctx.ensure_root_exists().await?;

        let folder_path = ctx.resolve_folder_path(folder_id).await?;
        let path = folder_path.join(format!("{file_name}.{file_extension}"));
        let file_path = path_to_record(&path)?;

        Ok(UploadTarget {
            folder_id,
            file_name,
            file_extension,
            file_path,
            path,
        })
    }

    /// Streams the upload to its planned path and returns the byte count.
    ///
    /// Fails with `FileAlreadyExists` if the path is taken, including by a
    /// concurrent upload, and with `Validation` past the size limit.
    pub async fn store_upload(&self, target: &UploadTarget, stream: ByteStream) -> AppResult<u64> {
        self.storage
            .write_new(&target.path, stream, self.max_upload_size_bytes)
            .await
    }

    /// Inserts the record for a stored upload.
    ///
    /// The folder is resolved again, so an upload whose folder was deleted
    /// while the bytes were streaming fails with `FolderNotFound`. Removing
    /// the stored file on failure is left to the caller.
    pub async fn record_upload(
        &self,
        ctx: &mut RequestContext,
        target: &UploadTarget,
        size: u64,
    ) -> AppResult<File> {
        ctx.resolve_folder_path(target.folder_id).await?;

        let record = CreateFile::new(
            target.file_path.clone(),
            target.file_name.clone(),
            target.file_extension.clone(),
            i64::try_from(size).unwrap_or(i64::MAX),
            target.folder_id,
        );
        let file = ctx.files().add(&record).await?;

        info!(
            user_id = %ctx.user_id(),
            file_id = %file.id,
            folder_id = ?file.folder_id,
            path = %file.file_path,
            bytes = size,
            "File uploaded"
        );

        Ok(file)
    }

    /// Resolves an owned file to its physical path.
    pub async fn get_file_path(&self, ctx: &mut RequestContext, file_id: &str) -> AppResult<PathBuf> {
        ctx.resolve_file_path(file_id).await
    }

    /// Opens an owned file for streaming.
    ///
    /// A record whose physical file has vanished is reported as
    /// `FileNotFound`.
    pub async fn open_file(
        &self,
        ctx: &mut RequestContext,
        file_id: &str,
    ) -> AppResult<(File, ByteStream)> {
        let file = ctx.resolve_file(file_id).await?;
        match self.storage.read(Path::new(&file.file_path)).await {
            Ok(stream) => {
                debug!(user_id = %ctx.user_id(), file_id, "Opened file for download");
                Ok((file, stream))
            }
            Err(e) if e.kind == ErrorKind::FileNotFound => {
                warn!(
                    user_id = %ctx.user_id(),
                    file_id,
                    path = %file.file_path,
                    "File record has no file on disk"
                );
                Err(AppError::file_not_found(file_id))
            }
            Err(e) => Err(e),
        }
    }

    /// Lists every file record directly inside `folder_id` (`None` = user
    /// root), including files staged for deletion.
    pub async fn list_files_in_folder(
        &self,
        ctx: &mut RequestContext,
        folder_id: Option<i64>,
    ) -> AppResult<Vec<File>> {
        if let Some(folder) = folder_id {
            ctx.resolve_folder(folder).await?;
        }
        ctx.files()
            .find_all(&FileFilter::all().folder(folder_id))
            .await
    }

    /// Deletes an owned file and its record.
    ///
    /// Returns `NotFound` when the caller owns no such file and
    /// `AlreadyGone` when the record existed without its physical file.
    /// Fails with `Conflict` while the file is staged for deferred deletion.
    pub async fn delete_file(
        &self,
        ctx: &mut RequestContext,
        file_id: &str,
    ) -> AppResult<DeleteOutcome> {
        let file = match ctx.resolve_file(file_id).await {
            Ok(file) => file,
            Err(e) if e.is_not_found() => {
                debug!(user_id = %ctx.user_id(), file_id, "File already absent");
                return Ok(DeleteOutcome::NotFound);
            }
            Err(e) => return Err(e),
        };

        if let Some(staged) = ctx.trash().find_by_file(file_id).await? {
            if staged.is_live(Utc::now()) {
                return Err(AppError::conflict(format!(
                    "File {file_id} is staged for deletion until {}",
                    staged.expires_at
                )));
            }
        }

        let removed = self.storage.remove_file(Path::new(&file.file_path)).await?;
        if !removed {
            warn!(
                user_id = %ctx.user_id(),
                file_id,
                path = %file.file_path,
                "File record had no file on disk"
            );
        }

        ctx.files().delete(&FileFilter::all().id(file_id)).await?;

        info!(
            user_id = %ctx.user_id(),
            file_id,
            path = %file.file_path,
            "File deleted"
        );

        Ok(if removed {
            DeleteOutcome::Deleted
        } else {
            DeleteOutcome::AlreadyGone
        })
    }

    /// Stars or unstars an owned file.
    pub async fn set_favorite(
        &self,
        ctx: &mut RequestContext,
        file_id: &str,
        favorite: bool,
    ) -> AppResult<File> {
        let file = ctx
            .files()
            .set_favorite(file_id, favorite)
            .await?
            .ok_or_else(|| AppError::file_not_found(file_id))?;

        info!(user_id = %ctx.user_id(), file_id, favorite, "File favorite updated");
        Ok(file)
    }

    /// Best-effort removal of a file written by a failed operation.
    pub(crate) async fn discard(&self, path: &Path) {
        if let Err(e) = self.storage.remove_file(path).await {
            warn!(path = %path.display(), error = %e, "Failed to remove orphan file");
        }
    }
}
