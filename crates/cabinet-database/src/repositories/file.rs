//! File repository implementation.

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use cabinet_core::error::{AppError, ErrorKind};
use cabinet_core::result::AppResult;
use cabinet_entity::file::model::{CreateFile, File};

/// Predicate over one owner's files. An empty filter matches all of them.
#[derive(Debug, Clone, Default)]
pub struct FileFilter {
    id: Option<String>,
    folder: Option<Option<i64>>,
    path: Option<String>,
}

impl FileFilter {
    /// Match every file of the owner.
    pub fn all() -> Self {
        Self::default()
    }

    /// Match a single file id.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Match files directly inside `folder` (`None` = the user root).
    pub fn folder(mut self, folder: Option<i64>) -> Self {
        self.folder = Some(folder);
        self
    }

    /// Match an exact physical path.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    fn push_predicate<'a>(&self, qb: &mut QueryBuilder<'a, Sqlite>, owner: &'a str) {
        qb.push(" WHERE user_id = ").push_bind(owner);
        if let Some(id) = &self.id {
            qb.push(" AND id = ").push_bind(id.clone());
        }
        match self.folder {
            None => {}
            Some(None) => {
                qb.push(" AND folder_id IS NULL");
            }
            Some(Some(folder)) => {
                qb.push(" AND folder_id = ").push_bind(folder);
            }
        }
        if let Some(path) = &self.path {
            qb.push(" AND file_path = ").push_bind(path.clone());
        }
    }
}

/// Repository for file records of a single owner.
#[derive(Debug)]
pub struct FileRepository<'c> {
    conn: &'c mut SqliteConnection,
    owner: &'c str,
}

impl<'c> FileRepository<'c> {
    /// Create a repository bound to `owner` on the given connection.
    pub fn new(conn: &'c mut SqliteConnection, owner: &'c str) -> Self {
        Self { conn, owner }
    }

    /// Insert a file record owned by this repository's owner.
    ///
    /// A collision on `file_path` maps to `FileAlreadyExists`.
    pub async fn add(&mut self, data: &CreateFile) -> AppResult<File> {
        let now = Utc::now();
        sqlx::query_as::<_, File>(
            "INSERT INTO files (id, user_id, file_path, file_name, file_extension, file_size, \
             is_favorite, is_deleted, created_at, updated_at, folder_id) \
             VALUES (?, ?, ?, ?, ?, ?, 0, 0, ?, ?, ?) RETURNING *",
        )
        .bind(&data.id)
        .bind(self.owner)
        .bind(&data.file_path)
        .bind(&data.file_name)
        .bind(&data.file_extension)
        .bind(data.file_size)
        .bind(now)
        .bind(now)
        .bind(data.folder_id)
        .fetch_one(&mut *self.conn)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::file_already_exists(format!(
                    "File path '{}' already exists",
                    data.file_path
                ))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create file", e),
        })
    }

    /// Find at most one file matching `filter`.
    pub async fn find_one(&mut self, filter: &FileFilter) -> AppResult<Option<File>> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM files");
        filter.push_predicate(&mut qb, self.owner);
        qb.push(" ORDER BY rowid LIMIT 1");
        qb.build_query_as::<File>()
            .fetch_optional(&mut *self.conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    /// Find all files matching `filter`, in insertion order.
    pub async fn find_all(&mut self, filter: &FileFilter) -> AppResult<Vec<File>> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM files");
        filter.push_predicate(&mut qb, self.owner);
        qb.push(" ORDER BY rowid");
        qb.build_query_as::<File>()
            .fetch_all(&mut *self.conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list files", e))
    }

    /// Set or clear the favorite flag. Returns `None` if no owned file matched.
    pub async fn set_favorite(&mut self, id: &str, favorite: bool) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>(
            "UPDATE files SET is_favorite = ?, updated_at = ? \
             WHERE id = ? AND user_id = ? RETURNING *",
        )
        .bind(favorite)
        .bind(Utc::now())
        .bind(id)
        .bind(self.owner)
        .fetch_optional(&mut *self.conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update favorite", e))
    }

    /// Set or clear the soft-delete flag. Returns `None` if no owned file matched.
    pub async fn set_deleted(&mut self, id: &str, deleted: bool) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>(
            "UPDATE files SET is_deleted = ?, updated_at = ? \
             WHERE id = ? AND user_id = ? RETURNING *",
        )
        .bind(deleted)
        .bind(Utc::now())
        .bind(id)
        .bind(self.owner)
        .fetch_optional(&mut *self.conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update file state", e))
    }

    /// Delete files matching `filter`. Staging rows cascade.
    pub async fn delete(&mut self, filter: &FileFilter) -> AppResult<u64> {
        let mut qb = QueryBuilder::<Sqlite>::new("DELETE FROM files");
        filter.push_predicate(&mut qb, self.owner);
        qb.build()
            .execute(&mut *self.conn)
            .await
            .map(|r| r.rows_affected())
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete file", e))
    }
}
