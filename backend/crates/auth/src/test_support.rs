//! In-memory User Directory for tests (feature `test-support`)

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use tokio::sync::Mutex;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Vec-backed directory with the same uniqueness rule as the `users` table
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<Mutex<Vec<User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.lock().await.is_empty()
    }

    pub async fn get(&self, user_id: &UserId) -> Option<User> {
        self.users
            .lock()
            .await
            .iter()
            .find(|u| u.user_id == *user_id)
            .cloned()
    }
}

impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let mut users = self.users.lock().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(AuthError::UserAlreadyExists);
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .await
            .iter()
            .find(|u| u.email == *email)
            .cloned())
    }

    async fn find_by_refresh_token(&self, token: &str) -> AuthResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .await
            .iter()
            .find(|u| u.refresh_token == token)
            .cloned())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        Ok(self.get(user_id).await)
    }

    async fn update_refresh_token(
        &self,
        user_id: &UserId,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> AuthResult<()> {
        let mut users = self.users.lock().await;
        let user = users
            .iter_mut()
            .find(|u| u.user_id == *user_id)
            .ok_or(AuthError::UserNotFound)?;
        user.rotate_refresh_token(token.to_string(), expires_at);
        Ok(())
    }
}
