//! Register Use Case
//!
//! Creates a user and hands back a first token pair.

use std::sync::Arc;

use chrono::Utc;

use crate::application::config::AuthConfig;
use crate::application::TokenPair;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email,
    user_password::{RawPassword, UserPassword},
    user_role::UserRole,
};
use crate::error::AuthResult;

pub struct RegisterInput {
    pub email: String,
    pub password: String,
    /// "Author" or "Reader"
    pub role: String,
}

pub struct RegisterUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> RegisterUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<TokenPair> {
        let email = Email::new(&input.email)?;
        let role = UserRole::from_code(&input.role)?;

        let raw_password = RawPassword::new(input.password)?;
        let password_hash = UserPassword::from_raw(&raw_password, self.config.pepper())?;

        let codec = self.config.codec();

        // The stored expiry is computed here, separately from the `exp`
        // embedded in the token.
        let refresh = codec.issue(email.as_str(), self.config.refresh_token_ttl)?;
        let refresh_expires_at = Utc::now() + self.config.refresh_token_ttl_chrono();

        let user = User::new(email, password_hash, role, refresh.token, refresh_expires_at);
        self.repo.create(&user).await?;

        let access = codec.issue(&user.user_id.to_string(), self.config.access_token_ttl)?;

        tracing::info!(
            user_id = %user.user_id,
            email = %user.email,
            role = %user.user_role,
            "User registered"
        );

        Ok(TokenPair {
            message: "Registered successfully",
            access_token: access.token,
            refresh_token: user.refresh_token,
        })
    }
}
