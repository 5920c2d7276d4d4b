//! User Entity
//!
//! Identity record owned by the User Directory. Created once at
//! registration; only the refresh-token pair changes afterwards.

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::value_object::{email::Email, user_password::UserPassword, user_role::UserRole};

#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    /// Unique, login key
    pub email: Email,
    pub password_hash: UserPassword,
    pub user_role: UserRole,
    /// The single refresh token currently honoured for this user
    pub refresh_token: String,
    pub refresh_token_expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        email: Email,
        password_hash: UserPassword,
        user_role: UserRole,
        refresh_token: String,
        refresh_token_expires_at: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            email,
            password_hash,
            user_role,
            refresh_token,
            refresh_token_expires_at,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the active refresh token; any earlier one stops working.
    pub fn rotate_refresh_token(&mut self, token: String, expires_at: DateTime<Utc>) {
        self.refresh_token = token;
        self.refresh_token_expires_at = expires_at;
        self.updated_at = Utc::now();
    }

    pub fn is_author(&self) -> bool {
        self.user_role.can_author()
    }
}
