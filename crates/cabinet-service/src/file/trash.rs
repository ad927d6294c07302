//! Deferred-deletion staging.
//!
//! Staging marks a file deleted and records when it may be reaped. The
//! reaper itself is not part of Cabinet; until a staging row expires the
//! file is protected from direct deletion and from folder deletion.

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use cabinet_core::error::AppError;
use cabinet_core::result::AppResult;
use cabinet_entity::file::File;
use cabinet_entity::trash::{CreateDeletedFile, DeletedFile};

use crate::context::RequestContext;

/// Stages and restores files.
#[derive(Debug, Clone)]
pub struct TrashService {
    retention: Duration,
}

impl TrashService {
    /// Creates a trash service keeping staged files for `retention_hours`.
    pub fn new(retention_hours: u64) -> Self {
        Self {
            retention: i64::try_from(retention_hours)
                .ok()
                .and_then(Duration::try_hours)
                .unwrap_or(Duration::MAX),
        }
    }

    /// Stages an owned file for deferred deletion.
    ///
    /// Fails with `Conflict` if the file is already staged and the staging
    /// row has not expired. An expired row is replaced.
    pub async fn stage_file(&self, ctx: &mut RequestContext, file_id: &str) -> AppResult<DeletedFile> {
        ctx.resolve_file(file_id).await?;

        let now = Utc::now();
        if let Some(existing) = ctx.trash().find_by_file(file_id).await? {
            if existing.is_live(now) {
                return Err(AppError::conflict(format!(
                    "File {file_id} is already staged for deletion"
                )));
            }
            ctx.trash().delete(file_id).await?;
        }

        ctx.files().set_deleted(file_id, true).await?;
        let staged = ctx
            .trash()
            .add(&CreateDeletedFile {
                file_id: file_id.to_string(),
                deleted_at: now,
                expires_at: now
                    .checked_add_signed(self.retention)
                    .unwrap_or(DateTime::<Utc>::MAX_UTC),
            })
            .await?;

        info!(
            user_id = %ctx.user_id(),
            file_id,
            expires_at = %staged.expires_at,
            "File staged for deletion"
        );
        Ok(staged)
    }

    /// Removes an owned file from staging and clears its deleted flag.
    ///
    /// Fails with `Conflict` if the file is not staged.
    pub async fn restore_file(&self, ctx: &mut RequestContext, file_id: &str) -> AppResult<File> {
        let file = ctx.resolve_file(file_id).await?;

        let unstaged = ctx.trash().delete(file_id).await?;
        if unstaged == 0 && !file.is_deleted {
            return Err(AppError::conflict(format!(
                "File {file_id} is not staged for deletion"
            )));
        }

        let file = ctx
            .files()
            .set_deleted(file_id, false)
            .await?
            .ok_or_else(|| AppError::file_not_found(file_id))?;

        info!(user_id = %ctx.user_id(), file_id, "File restored from staging");
        Ok(file)
    }
}
