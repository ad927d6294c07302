//! Backend health report.

use std::path::PathBuf;

use serde::Serialize;

/// Result of probing the record store and the storage backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    /// The database answered a trivial query.
    pub database: bool,
    /// The storage root exists and is a directory.
    pub storage: bool,
    /// Storage backend name, e.g. `local`.
    pub storage_provider: String,
    /// Absolute storage root.
    pub storage_root: PathBuf,
}

impl HealthReport {
    /// Whether every backend is reachable.
    pub fn is_healthy(&self) -> bool {
        self.database && self.storage
    }
}
