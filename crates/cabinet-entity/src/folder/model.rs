//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A folder in a user's hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Folder {
    /// Unique folder identifier, assigned by the database.
    pub id: i64,
    /// The folder owner.
    pub user_id: String,
    /// Display name; also the name of the physical directory.
    pub folder_name: String,
    /// Absolute physical directory path. Unique across the store.
    pub folder_path: String,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// Parent folder ID (null for folders directly under the user root).
    pub parent_folder_id: Option<i64>,
}

/// Data required to create a new folder record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolder {
    /// Folder name.
    pub folder_name: String,
    /// Absolute physical path of the already-created directory.
    pub folder_path: String,
    /// Parent folder (None for the user root).
    pub parent_folder_id: Option<i64>,
}
