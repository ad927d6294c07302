//! JWT-backed identity resolver.

use async_trait::async_trait;
use tracing::debug;

use cabinet_core::config::AuthConfig;
use cabinet_core::result::AppResult;
use cabinet_core::traits::identity::IdentityResolver;

use crate::jwt::decoder::JwtDecoder;

/// Resolves bearer tokens to users by validating them as HS256 JWTs.
#[derive(Debug, Clone)]
pub struct JwtIdentityResolver {
    decoder: JwtDecoder,
}

impl JwtIdentityResolver {
    /// Creates a resolver from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            decoder: JwtDecoder::new(config),
        }
    }
}

#[async_trait]
impl IdentityResolver for JwtIdentityResolver {
    async fn resolve_subject(&self, token: &str) -> AppResult<String> {
        let token = token.strip_prefix("Bearer ").unwrap_or(token).trim();
        let claims = self.decoder.decode(token).inspect_err(|e| {
            debug!(error = %e, "Token rejected");
        })?;
        Ok(claims.sub)
    }
}
