//! PostgreSQL User Directory

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email, user_password::UserPassword, user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

const USER_COLUMNS: &str = r#"
    user_id,
    email,
    password_hash,
    user_role,
    refresh_token,
    refresh_token_expires_at,
    created_at,
    updated_at
"#;

/// PostgreSQL-backed user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl UserRepository for PgUserRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                email,
                password_hash,
                user_role,
                refresh_token,
                refresh_token_expires_at,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.email.as_str())
        .bind(user.password_hash.as_phc_string())
        .bind(user.user_role.id())
        .bind(&user.refresh_token)
        .bind(user.refresh_token_expires_at)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AuthError::UserAlreadyExists
            }
            other => AuthError::Database(other),
        })?;

        Ok(())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_refresh_token(&self, token: &str) -> AuthResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE refresh_token = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn update_refresh_token(
        &self,
        user_id: &UserId,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> AuthResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET refresh_token = $2,
                refresh_token_expires_at = $3,
                updated_at = NOW()
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(token)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AuthError::UserNotFound);
        }

        Ok(())
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    email: String,
    password_hash: String,
    user_role: i16,
    refresh_token: String,
    refresh_token_expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let user_role = UserRole::from_id(self.user_role).ok_or_else(|| {
            AuthError::Internal(format!("Invalid user_role id: {}", self.user_role))
        })?;

        Ok(User {
            user_id: UserId::from(self.user_id),
            email: Email::from_db(self.email),
            password_hash: UserPassword::from_phc_string(self.password_hash)?,
            user_role,
            refresh_token: self.refresh_token,
            refresh_token_expires_at: self.refresh_token_expires_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
