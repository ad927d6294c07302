//! Folder repository implementation.

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use cabinet_core::error::{AppError, ErrorKind};
use cabinet_core::result::AppResult;
use cabinet_entity::folder::model::{CreateFolder, Folder};

/// Predicate over one owner's folders. An empty filter matches all of them.
#[derive(Debug, Clone, Default)]
pub struct FolderFilter {
    id: Option<i64>,
    parent: Option<Option<i64>>,
}

impl FolderFilter {
    /// Match every folder of the owner.
    pub fn all() -> Self {
        Self::default()
    }

    /// Match a single folder id.
    pub fn id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Match direct children of `parent` (`None` = the user root).
    pub fn parent(mut self, parent: Option<i64>) -> Self {
        self.parent = Some(parent);
        self
    }

    fn push_predicate<'a>(&self, qb: &mut QueryBuilder<'a, Sqlite>, owner: &'a str) {
        qb.push(" WHERE user_id = ").push_bind(owner);
        if let Some(id) = self.id {
            qb.push(" AND id = ").push_bind(id);
        }
        match self.parent {
            None => {}
            Some(None) => {
                qb.push(" AND parent_folder_id IS NULL");
            }
            Some(Some(parent)) => {
                qb.push(" AND parent_folder_id = ").push_bind(parent);
            }
        }
    }
}

/// Repository for folder records of a single owner.
#[derive(Debug)]
pub struct FolderRepository<'c> {
    conn: &'c mut SqliteConnection,
    owner: &'c str,
}

impl<'c> FolderRepository<'c> {
    /// Create a repository bound to `owner` on the given connection.
    pub fn new(conn: &'c mut SqliteConnection, owner: &'c str) -> Self {
        Self { conn, owner }
    }

    /// Insert a folder record owned by this repository's owner.
    ///
    /// A collision on `folder_path` maps to `FolderAlreadyExists`.
    pub async fn add(&mut self, data: &CreateFolder) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (user_id, folder_name, folder_path, created_at, parent_folder_id) \
             VALUES (?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(self.owner)
        .bind(&data.folder_name)
        .bind(&data.folder_path)
        .bind(Utc::now())
        .bind(data.parent_folder_id)
        .fetch_one(&mut *self.conn)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::folder_already_exists(format!(
                    "Folder path '{}' already exists",
                    data.folder_path
                ))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create folder", e),
        })
    }

    /// Find at most one folder matching `filter`.
    pub async fn find_one(&mut self, filter: &FolderFilter) -> AppResult<Option<Folder>> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM folders");
        filter.push_predicate(&mut qb, self.owner);
        qb.push(" ORDER BY id LIMIT 1");
        qb.build_query_as::<Folder>()
            .fetch_optional(&mut *self.conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find folder", e))
    }

    /// Find all folders matching `filter`, in insertion order.
    pub async fn find_all(&mut self, filter: &FolderFilter) -> AppResult<Vec<Folder>> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM folders");
        filter.push_predicate(&mut qb, self.owner);
        qb.push(" ORDER BY id");
        qb.build_query_as::<Folder>()
            .fetch_all(&mut *self.conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list folders", e))
    }

    /// Delete folders matching `filter`. Descendants cascade.
    pub async fn delete(&mut self, filter: &FolderFilter) -> AppResult<u64> {
        let mut qb = QueryBuilder::<Sqlite>::new("DELETE FROM folders");
        filter.push_predicate(&mut qb, self.owner);
        qb.build()
            .execute(&mut *self.conn)
            .await
            .map(|r| r.rows_affected())
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete folder", e))
    }
}
