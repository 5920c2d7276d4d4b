//! Auth Router

use axum::{Router, routing::post};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::UserRepository;
use crate::infra::postgres::PgUserRepository;
use crate::presentation::handlers::{self, AuthAppState};

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(repo: PgUserRepository, config: AuthConfig) -> Router {
    auth_router_shared(Arc::new(repo), Arc::new(config))
}

/// Create a generic Auth router for any repository implementation
pub fn auth_router_generic<R>(repo: R, config: AuthConfig) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    auth_router_shared(Arc::new(repo), Arc::new(config))
}

/// Same as [`auth_router_generic`] for callers that also hand the
/// repository and config to the bearer gate.
pub fn auth_router_shared<R>(repo: Arc<R>, config: Arc<AuthConfig>) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let state = AuthAppState { repo, config };

    Router::new()
        .route("/register", post(handlers::register::<R>))
        .route("/login", post(handlers::login::<R>))
        .route("/refresh-token", post(handlers::refresh_token::<R>))
        .with_state(state)
}
