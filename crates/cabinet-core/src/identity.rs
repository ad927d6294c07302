//! The authenticated identity carried through every storage operation.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::AppError;
use crate::result::AppResult;

/// A user identity that has already been resolved from a credential.
///
/// Path resolution and every record lookup take this type rather than a
/// bare id, so an operation cannot be issued on behalf of a user whose
/// token was never checked. Values are only created by
/// [`IdentityResolver::resolve`]. The user id doubles as the name of the
/// user's root directory, so it is validated as a single path segment.
///
/// [`IdentityResolver::resolve`]: crate::traits::IdentityResolver::resolve
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedUser {
    user_id: String,
    authenticated_at: DateTime<Utc>,
}

impl AuthenticatedUser {
    /// Wraps a verified token subject.
    pub(crate) fn from_subject(user_id: impl Into<String>) -> AppResult<Self> {
        let user_id = user_id.into();
        if user_id.is_empty()
            || user_id == "."
            || user_id == ".."
            || user_id.contains(['/', '\\', '\0'])
        {
            return Err(AppError::invalid_credentials(
                "Token subject is not a valid user id",
            ));
        }
        Ok(Self {
            user_id,
            authenticated_at: Utc::now(),
        })
    }

    /// The user's id.
    pub fn id(&self) -> &str {
        &self.user_id
    }

    /// When the credential was resolved.
    pub fn authenticated_at(&self) -> DateTime<Utc> {
        self.authenticated_at
    }
}
