//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A file owned by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct File {
    /// Opaque unique identifier (a UUID string), not a filesystem name.
    pub id: String,
    /// The file owner.
    pub user_id: String,
    /// Absolute physical file path. Unique across the store.
    pub file_path: String,
    /// Base name without the final extension.
    pub file_name: String,
    /// Final extension, without the dot.
    pub file_extension: String,
    /// File size in bytes.
    pub file_size: i64,
    /// Whether the owner starred this file.
    pub is_favorite: bool,
    /// Whether the file is staged for deferred deletion.
    pub is_deleted: bool,
    /// When the file was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
    /// The containing folder (null for the user root).
    pub folder_id: Option<i64>,
}

impl File {
    /// The name the file was uploaded under, e.g. `report.pdf`.
    pub fn display_name(&self) -> String {
        format!("{}.{}", self.file_name, self.file_extension)
    }
}

/// Data required to create a new file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFile {
    /// Pre-generated identifier.
    pub id: String,
    /// Absolute physical path of the already-written file.
    pub file_path: String,
    /// Base name.
    pub file_name: String,
    /// Extension.
    pub file_extension: String,
    /// Bytes written.
    pub file_size: i64,
    /// Containing folder.
    pub folder_id: Option<i64>,
}

impl CreateFile {
    /// Start a new record with a freshly generated id.
    pub fn new(
        file_path: impl Into<String>,
        file_name: impl Into<String>,
        file_extension: impl Into<String>,
        file_size: i64,
        folder_id: Option<i64>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            file_path: file_path.into(),
            file_name: file_name.into(),
            file_extension: file_extension.into(),
            file_size,
            folder_id,
        }
    }
}
