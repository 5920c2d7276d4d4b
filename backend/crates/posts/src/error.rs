//! Post Error Types
//!
//! Post-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::object_store::ObjectStoreError;
use thiserror::Error;

pub type PostResult<T> = Result<T, PostError>;

#[derive(Debug, Error)]
pub enum PostError {
    /// A post was already created with this idempotency key
    #[error("Idempotency key has already been used")]
    InvalidIdempotencyKey,

    #[error("Post not found")]
    PostNotFound,

    /// Missing post, missing image and foreign ownership all look alike
    #[error("Post or image not found")]
    PostOrImageNotFound,

    #[error("Invalid post status: {0}")]
    InvalidPostStatus(String),

    /// Acting user is not the post's author
    #[error("You are not the author of this post")]
    OwnershipViolation,

    /// Acting user's role may not use this operation
    #[error("You do not have permission to perform this action")]
    NoPermission,

    #[error("Invalid image id: {0}")]
    InvalidImageId(String),

    /// Malformed request payload
    #[error("Incorrect data: {0}")]
    IncorrectData(String),

    #[error(transparent)]
    ObjectStore(#[from] ObjectStoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PostError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PostError::InvalidPostStatus(_)
            | PostError::InvalidImageId(_)
            | PostError::IncorrectData(_) => ErrorKind::BadRequest,
            PostError::OwnershipViolation | PostError::NoPermission => ErrorKind::Forbidden,
            PostError::PostNotFound | PostError::PostOrImageNotFound => ErrorKind::NotFound,
            PostError::InvalidIdempotencyKey => ErrorKind::Conflict,
            PostError::ObjectStore(ObjectStoreError::Timeout(_)) => ErrorKind::ServiceUnavailable,
            PostError::ObjectStore(_) | PostError::Database(_) | PostError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn code(&self) -> &'static str {
        match self {
            PostError::InvalidIdempotencyKey => "INVALID_IDEMPOTENCY_KEY",
            PostError::PostNotFound => "POST_NOT_FOUND",
            PostError::PostOrImageNotFound => "POST_OR_IMAGE_NOT_FOUND",
            PostError::InvalidPostStatus(_) => "INVALID_POST_STATUS",
            PostError::OwnershipViolation => "OWNERSHIP_VIOLATION",
            PostError::NoPermission => "NO_PERMISSION",
            PostError::InvalidImageId(_) => "INVALID_IMAGE_ID",
            PostError::IncorrectData(_) => "INCORRECT_DATA",
            PostError::ObjectStore(ObjectStoreError::BucketNotFound(_)) => "BUCKET_NOT_FOUND",
            PostError::ObjectStore(ObjectStoreError::Upload(_)) => "UPLOAD_FAILED",
            PostError::ObjectStore(ObjectStoreError::PresignedUrl(_)) => "IMAGE_URL_FAILED",
            PostError::ObjectStore(ObjectStoreError::Delete(_)) => "DELETE_FAILED",
            PostError::ObjectStore(ObjectStoreError::Timeout(_)) => "OBJECT_STORE_TIMEOUT",
            PostError::ObjectStore(ObjectStoreError::Configuration(_)) => {
                "OBJECT_STORE_MISCONFIGURED"
            }
            PostError::Database(_) => "DATABASE_ERROR",
            PostError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    fn log(&self) {
        match self {
            PostError::Database(e) => {
                tracing::error!(error = %e, "Posts database error");
            }
            PostError::ObjectStore(e) => {
                tracing::error!(error = %e, "Object store error");
            }
            PostError::Internal(msg) => {
                tracing::error!(message = %msg, "Posts internal error");
            }
            PostError::OwnershipViolation | PostError::NoPermission => {
                tracing::warn!(error = %self, "Rejected post operation");
            }
            _ => {
                tracing::debug!(error = %self, "Post error");
            }
        }
    }
}

impl From<PostError> for AppError {
    fn from(err: PostError) -> Self {
        let code = err.code();
        match err {
            PostError::Database(e) => AppError::from(e).with_code(code),
            PostError::InvalidIdempotencyKey => AppError::new(err.kind(), err.to_string())
                .with_code(code)
                .with_action("Use a fresh idempotency key for a new post"),
            other => AppError::new(other.kind(), other.to_string()).with_code(code),
        }
    }
}

impl IntoResponse for PostError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}
