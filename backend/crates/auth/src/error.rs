//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::token::TokenError;
use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("{0}")]
    PasswordPolicy(String),

    /// Wrong password *or* unknown email. Never tells which.
    #[error("Invalid email or password")]
    InvalidEmailOrPassword,

    #[error("User already exists")]
    UserAlreadyExists,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Invalid access token")]
    InvalidAccessToken,

    #[error("Missing or malformed bearer token")]
    MissingBearerToken,

    #[error(transparent)]
    Token(#[from] TokenError),

    /// Malformed request payload
    #[error("Incorrect data: {0}")]
    IncorrectData(String),

    #[error("Password hashing failed: {0}")]
    PasswordHashing(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidEmail(_)
            | AuthError::InvalidRole(_)
            | AuthError::PasswordPolicy(_)
            | AuthError::IncorrectData(_) => ErrorKind::BadRequest,
            AuthError::InvalidEmailOrPassword
            | AuthError::UserNotFound
            | AuthError::InvalidRefreshToken
            | AuthError::InvalidAccessToken
            | AuthError::MissingBearerToken => ErrorKind::Unauthorized,
            AuthError::Token(TokenError::Invalid(_) | TokenError::Expired) => {
                ErrorKind::Unauthorized
            }
            AuthError::UserAlreadyExists => ErrorKind::Conflict,
            AuthError::Token(TokenError::Signing(_))
            | AuthError::PasswordHashing(_)
            | AuthError::Database(_)
            | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Stable identifier sent to clients alongside the message
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidEmail(_) => "INVALID_EMAIL",
            AuthError::InvalidRole(_) => "INVALID_ROLE",
            AuthError::PasswordPolicy(_) => "WEAK_PASSWORD",
            AuthError::InvalidEmailOrPassword => "INVALID_EMAIL_OR_PASSWORD",
            AuthError::UserAlreadyExists => "USER_ALREADY_EXISTS",
            AuthError::UserNotFound => "USER_NOT_FOUND",
            AuthError::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",
            AuthError::InvalidAccessToken
            | AuthError::MissingBearerToken
            | AuthError::Token(TokenError::Invalid(_)) => "INVALID_ACCESS_TOKEN",
            AuthError::Token(TokenError::Expired) => "TOKEN_EXPIRED",
            AuthError::Token(TokenError::Signing(_)) => "TOKEN_SIGNING_FAILED",
            AuthError::IncorrectData(_) => "INCORRECT_DATA",
            AuthError::PasswordHashing(_) => "PASSWORD_HASHING_FAILED",
            AuthError::Database(_) => "DATABASE_ERROR",
            AuthError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::PasswordHashing(msg) => {
                tracing::error!(message = %msg, "Password hashing failed");
            }
            AuthError::Token(TokenError::Signing(msg)) => {
                tracing::error!(message = %msg, "Token signing failed");
            }
            AuthError::InvalidEmailOrPassword => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::InvalidRefreshToken => {
                tracing::warn!("Rejected refresh token");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        let code = err.code();
        match err {
            AuthError::Database(e) => AppError::from(e).with_code(code),
            AuthError::InvalidEmailOrPassword => AppError::new(err.kind(), err.to_string())
                .with_code(code)
                .with_action("Check your email and password"),
            AuthError::Token(TokenError::Expired) => AppError::new(err.kind(), err.to_string())
                .with_code(code)
                .with_action("Refresh your access token"),
            other => AppError::new(other.kind(), other.to_string()).with_code(code),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}
