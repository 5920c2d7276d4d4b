//! Authorize Use Case
//!
//! Resolves an access token to the user it was issued for.

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

pub struct AuthorizeUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> AuthorizeUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, access_token: &str) -> AuthResult<User> {
        let claims = self.config.codec().validate(access_token)?;

        let user_id: UserId = claims
            .subject
            .as_deref()
            .and_then(|sub| sub.parse().ok())
            .ok_or(AuthError::InvalidAccessToken)?;

        self.repo
            .find_by_id(&user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}
