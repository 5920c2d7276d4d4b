//! Repository Traits
//!
//! User Directory contract. Implementations enforce email uniqueness
//! themselves and report a violation as `AuthError::UserAlreadyExists`.

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::entity::user::User;
use crate::domain::value_object::email::Email;
use crate::error::AuthResult;

#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a new user. Duplicate email is `UserAlreadyExists`.
    async fn create(&self, user: &User) -> AuthResult<()>;

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// The user whose *currently stored* refresh token equals `token`
    async fn find_by_refresh_token(&self, token: &str) -> AuthResult<Option<User>>;

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Overwrite the stored refresh token and its expiry
    async fn update_refresh_token(
        &self,
        user_id: &UserId,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> AuthResult<()>;
}
