//! Application Layer
//!
//! Use cases and application services.

pub mod authorize;
pub mod config;
pub mod login;
pub mod refresh_token;
pub mod register;

// Re-exports
pub use authorize::AuthorizeUseCase;
pub use config::AuthConfig;
pub use login::{LoginInput, LoginUseCase};
pub use refresh_token::RefreshTokenUseCase;
pub use register::{RegisterInput, RegisterUseCase};

/// Result of register, login and refresh
///
/// The access token travels in the `Authorization` response header; only
/// the refresh token goes into the body.
#[derive(Debug)]
pub struct TokenPair {
    pub message: &'static str,
    pub access_token: String,
    pub refresh_token: String,
}
