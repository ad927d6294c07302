//! Storage configuration.

use serde::{Deserialize, Serialize};

/// Physical storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Top-level directory holding one subdirectory per user.
    #[serde(default = "default_root_path")]
    pub root_path: String,
    /// Maximum upload size in bytes (default 5 GB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
    /// How long a staged deletion is kept before it may be reaped.
    #[serde(default = "default_trash_retention")]
    pub trash_retention_hours: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_root_path(),
            max_upload_size_bytes: default_max_upload(),
            trash_retention_hours: default_trash_retention(),
        }
    }
}

fn default_root_path() -> String {
    "./data/storage".to_string()
}

fn default_max_upload() -> u64 {
    5_368_709_120 // 5 GB
}

fn default_trash_retention() -> u64 {
    720 // 30 days
}
