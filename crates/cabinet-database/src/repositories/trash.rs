//! Deferred-deletion staging repository.

use sqlx::SqliteConnection;

use cabinet_core::error::{AppError, ErrorKind};
use cabinet_core::result::AppResult;
use cabinet_entity::trash::model::{CreateDeletedFile, DeletedFile};

/// Repository for one owner's staging rows.
#[derive(Debug)]
pub struct TrashRepository<'c> {
    conn: &'c mut SqliteConnection,
    owner: &'c str,
}

impl<'c> TrashRepository<'c> {
    /// Create a repository bound to `owner` on the given connection.
    pub fn new(conn: &'c mut SqliteConnection, owner: &'c str) -> Self {
        Self { conn, owner }
    }

    /// Stage a file. A file can be staged at most once.
    pub async fn add(&mut self, data: &CreateDeletedFile) -> AppResult<DeletedFile> {
        sqlx::query_as::<_, DeletedFile>(
            "INSERT INTO deleted_files (file_id, user_id, deleted_at, expires_at) \
             VALUES (?, ?, ?, ?) RETURNING *",
        )
        .bind(&data.file_id)
        .bind(self.owner)
        .bind(data.deleted_at)
        .bind(data.expires_at)
        .fetch_one(&mut *self.conn)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::conflict(format!("File {} is already staged", data.file_id))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to stage file", e),
        })
    }

    /// Find the staging row of a file, live or expired.
    pub async fn find_by_file(&mut self, file_id: &str) -> AppResult<Option<DeletedFile>> {
        sqlx::query_as::<_, DeletedFile>(
            "SELECT * FROM deleted_files WHERE file_id = ? AND user_id = ?",
        )
        .bind(file_id)
        .bind(self.owner)
        .fetch_optional(&mut *self.conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find staged file", e))
    }

    /// All staging rows for files anywhere below `folder_id`, including
    /// files in the folder itself.
    pub async fn find_under_folder(&mut self, folder_id: i64) -> AppResult<Vec<DeletedFile>> {
        sqlx::query_as::<_, DeletedFile>(
            "WITH RECURSIVE subtree(id) AS ( \
                SELECT id FROM folders WHERE id = ? AND user_id = ? \
                UNION ALL \
                SELECT f.id FROM folders f INNER JOIN subtree s ON f.parent_folder_id = s.id \
             ) \
             SELECT d.* FROM deleted_files d \
             INNER JOIN files fi ON fi.id = d.file_id \
             WHERE d.user_id = ? AND fi.folder_id IN (SELECT id FROM subtree) \
             ORDER BY d.id",
        )
        .bind(folder_id)
        .bind(self.owner)
        .bind(self.owner)
        .fetch_all(&mut *self.conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list staged files", e)
        })
    }

    /// Remove the staging row of a file.
    pub async fn delete(&mut self, file_id: &str) -> AppResult<u64> {
        sqlx::query("DELETE FROM deleted_files WHERE file_id = ? AND user_id = ?")
            .bind(file_id)
            .bind(self.owner)
            .execute(&mut *self.conn)
            .await
            .map(|r| r.rows_affected())
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to unstage file", e))
    }
}
