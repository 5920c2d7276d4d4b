//! Error Kind - Classification of errors
//!
//! [`ErrorKind`] is the coarse, transport-level class of an error. Domain
//! crates keep their own precise enums and collapse into one of these when
//! an error crosses the HTTP boundary.

use serde::Serialize;

/// HTTP-mapped error class
///
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// let kind = ErrorKind::Conflict;
/// assert_eq!(kind.status_code(), 409);
/// assert_eq!(kind.as_str(), "Conflict");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    /// 400 - malformed or semantically invalid input
    BadRequest,
    /// 401 - missing, invalid or expired credentials
    Unauthorized,
    /// 403 - authenticated but not allowed
    Forbidden,
    /// 404 - resource does not exist (or is masked as such)
    NotFound,
    /// 409 - conflicts with existing state (duplicate email, reused idempotency key)
    Conflict,
    /// 413 - request body over the configured limit
    PayloadTooLarge,
    /// 500
    InternalServerError,
    /// 503 - a dependency (database, object store) is unavailable or timed out
    ServiceUnavailable,
}

impl ErrorKind {
    #[inline]
    pub const fn status_code(&self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::Unauthorized => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::PayloadTooLarge => 413,
            ErrorKind::InternalServerError => 500,
            ErrorKind::ServiceUnavailable => 503,
        }
    }

    /// Standard reason phrase
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "Bad Request",
            ErrorKind::Unauthorized => "Unauthorized",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::NotFound => "Not Found",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::PayloadTooLarge => "Payload Too Large",
            ErrorKind::InternalServerError => "Internal Server Error",
            ErrorKind::ServiceUnavailable => "Service Unavailable",
        }
    }

    /// 5xx errors are logged at error level and never expose their detail.
    #[inline]
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    #[inline]
    pub const fn is_client_error(&self) -> bool {
        let code = self.status_code();
        code >= 400 && code < 500
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ErrorKind::BadRequest.status_code(), 400);
        assert_eq!(ErrorKind::Unauthorized.status_code(), 401);
        assert_eq!(ErrorKind::Forbidden.status_code(), 403);
        assert_eq!(ErrorKind::NotFound.status_code(), 404);
        assert_eq!(ErrorKind::Conflict.status_code(), 409);
        assert_eq!(ErrorKind::PayloadTooLarge.status_code(), 413);
        assert_eq!(ErrorKind::InternalServerError.status_code(), 500);
        assert_eq!(ErrorKind::ServiceUnavailable.status_code(), 503);
    }

    #[test]
    fn test_server_vs_client() {
        assert!(ErrorKind::Conflict.is_client_error());
        assert!(!ErrorKind::Conflict.is_server_error());
        assert!(ErrorKind::ServiceUnavailable.is_server_error());
        assert!(!ErrorKind::InternalServerError.is_client_error());
    }

    #[test]
    fn test_serialized_name() {
        let json = serde_json::to_string(&ErrorKind::PayloadTooLarge).unwrap();
        assert_eq!(json, "\"PAYLOAD_TOO_LARGE\"");
    }
}
