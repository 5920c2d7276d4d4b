//! Refresh Token Use Case
//!
//! Exchanges the user's current refresh token for a new access token. The
//! refresh token itself is returned unchanged.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::TokenPair;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

pub struct RefreshTokenUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> RefreshTokenUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, refresh_token: String) -> AuthResult<TokenPair> {
        let codec = self.config.codec();

        // Signature, algorithm and expiry failures all look the same here
        codec.validate(&refresh_token).map_err(|e| {
            tracing::debug!(error = %e, "Refresh token failed validation");
            AuthError::InvalidRefreshToken
        })?;

        // A validly signed token that is no longer the stored one is revoked
        let user = self
            .repo
            .find_by_refresh_token(&refresh_token)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let access = codec.issue(&user.user_id.to_string(), self.config.access_token_ttl)?;

        tracing::info!(user_id = %user.user_id, "Access token refreshed");

        Ok(TokenPair {
            message: "Refresh tokens successfully",
            access_token: access.token,
            refresh_token,
        })
    }
}
