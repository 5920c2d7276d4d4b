//! Error conversions
//!
//! `From` implementations for infrastructure errors and the axum response
//! encoding of [`AppError`].

use super::app_error::AppError;

// ============================================================================
// SQLx conversions (feature-gated)
// ============================================================================

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        let app_err = match &err {
            sqlx::Error::RowNotFound => AppError::not_found("Record not found"),
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                AppError::service_unavailable("Database unavailable")
            }
            sqlx::Error::Database(db_err) => {
                // https://www.postgresql.org/docs/current/errcodes-appendix.html
                match db_err.code().as_deref() {
                    Some("23505") => AppError::conflict("Duplicate key value"),
                    Some("23503") => AppError::conflict("Foreign key violation"),
                    Some("23502") | Some("23514") => {
                        AppError::bad_request("Constraint violation")
                    }
                    Some("53000" | "53100" | "53200" | "53300") => {
                        AppError::service_unavailable("Database resource exhausted")
                    }
                    Some("57P01" | "57P02" | "57P03") => {
                        AppError::service_unavailable("Database unavailable")
                    }
                    _ => AppError::internal("Database error"),
                }
            }
            _ => AppError::internal("Database error"),
        };
        app_err.with_source(err)
    }
}

// ============================================================================
// Axum conversions (feature-gated)
// ============================================================================

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::{HeaderValue, StatusCode, header};

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // RFC 7807 Problem Details for HTTP APIs
        let body = serde_json::json!({
            "type": format!("https://httpstatuses.io/{}", self.status_code()),
            "title": self.kind().as_str(),
            "status": self.status_code(),
            "detail": self.public_message(),
            "code": self.code(),
            "action": self.action(),
        });

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}
