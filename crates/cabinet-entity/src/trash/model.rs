//! Staging row for a file awaiting permanent removal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A file staged for deletion. While `expires_at` is in the future the
/// staged file must not be purged by any other path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct DeletedFile {
    /// Row identifier.
    pub id: i64,
    /// The staged file.
    pub file_id: String,
    /// The file owner.
    pub user_id: String,
    /// When the file was staged.
    pub deleted_at: DateTime<Utc>,
    /// When the reaper may remove it.
    pub expires_at: DateTime<Utc>,
}

impl DeletedFile {
    /// Whether the staging row still protects its file at `now`.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// Data required to stage a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDeletedFile {
    /// The file to stage.
    pub file_id: String,
    /// Staging timestamp.
    pub deleted_at: DateTime<Utc>,
    /// Expiry timestamp.
    pub expires_at: DateTime<Utc>,
}
