//! Result of an idempotent delete.

use serde::{Deserialize, Serialize};

/// What a delete call found and did.
///
/// All three variants are successes. A repeated delete reports `NotFound`
/// instead of failing, and ids owned by another user are indistinguishable
/// from ids that never existed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteOutcome {
    /// The physical node and the record were removed.
    Deleted,
    /// The physical node was already missing; the record was removed.
    AlreadyGone,
    /// No record owned by the caller matched; nothing was changed.
    NotFound,
}

impl std::fmt::Display for DeleteOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Deleted => write!(f, "deleted"),
            Self::AlreadyGone => write!(f, "already gone"),
            Self::NotFound => write!(f, "not found"),
        }
    }
}
