//! Identity resolver trait for turning opaque tokens into users.

use async_trait::async_trait;

use crate::identity::AuthenticatedUser;
use crate::result::AppResult;

/// Resolves an opaque credential to the user it was issued for.
///
/// Implementations only verify the token and report its subject.
/// [`resolve`](Self::resolve) is the one place an [`AuthenticatedUser`] is
/// minted, so code outside this crate cannot name a user without going
/// through a resolver.
///
/// Implementations must fail with
/// [`ErrorKind::InvalidCredentials`](crate::error::ErrorKind::InvalidCredentials)
/// for malformed, forged, or expired tokens.
#[async_trait]
pub trait IdentityResolver: Send + Sync + std::fmt::Debug + 'static {
    /// Verify `token` and return the user id it was issued for.
    async fn resolve_subject(&self, token: &str) -> AppResult<String>;

    /// Resolve `token` to an authenticated user.
    async fn resolve(&self, token: &str) -> AppResult<AuthenticatedUser> {
        let subject = self.resolve_subject(token).await?;
        AuthenticatedUser::from_subject(subject)
    }
}
