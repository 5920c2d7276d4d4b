//! Application Error - Unified error type for the application
//!
//! Defines [`AppError`] struct and [`AppResult<T>`] type alias.

use std::borrow::Cow;
use std::error::Error;
use std::fmt;

use super::kind::ErrorKind;

/// Unified application error
///
/// Domain errors (`AuthError`, `PostError`, ...) are converted into this type
/// at the HTTP boundary. It carries everything the response needs:
///
/// * `kind` - transport class (maps to the HTTP status)
/// * `message` - human readable detail
/// * `code` - stable machine-readable identifier, e.g. `INVALID_IDEMPOTENCY_KEY`
/// * `action` - optional hint for the client
/// * `source` - original error, kept for logging only
///
/// ```rust
/// use kernel::error::{app_error::AppError, kind::ErrorKind};
///
/// let err = AppError::conflict("Idempotency key already used")
///     .with_code("INVALID_IDEMPOTENCY_KEY")
///     .with_action("Retry with a fresh idempotency key");
/// assert_eq!(err.kind(), ErrorKind::Conflict);
/// assert_eq!(err.code(), Some("INVALID_IDEMPOTENCY_KEY"));
/// ```
pub struct AppError {
    kind: ErrorKind,
    message: Cow<'static, str>,
    code: Option<&'static str>,
    action: Option<Cow<'static, str>>,
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    // ========================================================================
    // Constructors
    // ========================================================================

    #[inline]
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            code: None,
            action: None,
            source: None,
        }
    }

    #[inline]
    pub fn bad_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    #[inline]
    pub fn unauthorized(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    #[inline]
    pub fn forbidden(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    #[inline]
    pub fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    #[inline]
    pub fn conflict(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    #[inline]
    pub fn internal(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InternalServerError, message)
    }

    #[inline]
    pub fn service_unavailable(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::ServiceUnavailable, message)
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Attach a stable machine-readable code
    #[inline]
    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }

    /// Attach a hint telling the client what to do next
    #[inline]
    pub fn with_action(mut self, action: impl Into<Cow<'static, str>>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Keep the underlying error for logs
    #[inline]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[inline]
    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[inline]
    pub fn code(&self) -> Option<&'static str> {
        self.code
    }

    #[inline]
    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    /// Message safe to show to clients. Server errors are reduced to their
    /// reason phrase so database or storage details never leave the process.
    pub fn public_message(&self) -> &str {
        if self.kind.is_server_error() {
            self.kind.as_str()
        } else {
            &self.message
        }
    }

    #[inline]
    pub fn is_server_error(&self) -> bool {
        self.kind.is_server_error()
    }

    #[inline]
    pub fn is_client_error(&self) -> bool {
        self.kind.is_client_error()
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = f.debug_struct("AppError");
        builder.field("kind", &self.kind);
        builder.field("message", &self.message);
        if let Some(code) = self.code {
            builder.field("code", &code);
        }
        if let Some(action) = &self.action {
            builder.field("action", action);
        }
        if let Some(source) = &self.source {
            builder.field("source", source);
        }
        builder.finish()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;
        if let Some(code) = self.code {
            write!(f, " ({})", code)?;
        }
        Ok(())
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}
