//! Login Use Case
//!
//! Verifies credentials and replaces the user's refresh token, so any token
//! handed out by an earlier login stops being accepted by refresh.

use std::sync::Arc;

use chrono::Utc;

use crate::application::config::AuthConfig;
use crate::application::TokenPair;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_password::RawPassword};
use crate::error::{AuthError, AuthResult};

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

pub struct LoginUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> LoginUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<TokenPair> {
        let email = Email::new(&input.email)?;

        // Unknown email and wrong password are indistinguishable
        let mut user = self
            .repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidEmailOrPassword)?;

        let raw_password = RawPassword::for_login(input.password);
        if !user.password_hash.verify(&raw_password, self.config.pepper()) {
            return Err(AuthError::InvalidEmailOrPassword);
        }

        let codec = self.config.codec();
        let refresh = codec.issue(user.email.as_str(), self.config.refresh_token_ttl)?;
        let refresh_expires_at = Utc::now() + self.config.refresh_token_ttl_chrono();

        self.repo
            .update_refresh_token(&user.user_id, &refresh.token, refresh_expires_at)
            .await?;
        user.rotate_refresh_token(refresh.token, refresh_expires_at);

        let access = codec.issue(&user.user_id.to_string(), self.config.access_token_ttl)?;

        tracing::info!(user_id = %user.user_id, "User logged in");

        Ok(TokenPair {
            message: "Logged in successfully",
            access_token: access.token,
            refresh_token: user.refresh_token,
        })
    }
}
