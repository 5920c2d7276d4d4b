//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - User entity, value objects, User Directory trait
//! - `application/` - Use cases (register, login, refresh, authorize)
//! - `infra/` - PostgreSQL User Directory
//! - `presentation/` - HTTP handlers, DTOs, router, bearer gate
//!
//! ## Tokens
//! - Access token: HS512 JWT, `sub` = user id, 2 hours, sent in the
//!   `Authorization: Bearer` response header
//! - Refresh token: HS512 JWT, `sub` = email, 7 days, stored on the user
//!   row; only the most recently issued one is honoured
//!
//! ## Security Model
//! - Passwords hashed with Argon2id (optional pepper)
//! - Login never reveals whether an email is registered
//! - Roles (`Author`, `Reader`) are fixed at registration

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use domain::entity::user::User;
pub use domain::repository::UserRepository;
pub use domain::value_object::user_role::UserRole;
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgUserRepository;
pub use presentation::middleware::{AuthMiddlewareState, CurrentUser, require_bearer_auth};
pub use presentation::router::{auth_router, auth_router_generic, auth_router_shared};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
