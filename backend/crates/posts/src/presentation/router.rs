//! Posts Router

use std::sync::Arc;

use auth::{AuthMiddlewareState, PgUserRepository, UserRepository, require_bearer_auth};
use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::{
    Router,
    routing::{delete, patch, post, put},
};
use platform::object_store::{ObjectStore, S3ObjectStore};

use crate::application::config::PostsConfig;
use crate::domain::repository::{ImageRepository, PostRepository};
use crate::infra::postgres::PgPostRepository;
use crate::presentation::handlers::{self, PostsAppState};

/// Create the Posts router with PostgreSQL and S3
pub fn posts_router(
    repo: PgPostRepository,
    store: S3ObjectStore,
    config: PostsConfig,
    gate: AuthMiddlewareState<PgUserRepository>,
) -> Router {
    posts_router_generic(repo, store, config, gate)
}

/// Create a generic Posts router for any store implementations.
///
/// Every route sits behind the bearer gate built from `gate`.
pub fn posts_router_generic<R, S, U>(
    repo: R,
    store: S,
    config: PostsConfig,
    gate: AuthMiddlewareState<U>,
) -> Router
where
    R: PostRepository + ImageRepository + Clone + Send + Sync + 'static,
    S: ObjectStore + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let upload_limit = config.max_upload_bytes;
    let state = PostsAppState {
        repo: Arc::new(repo),
        store: Arc::new(store),
        config: Arc::new(config),
    };

    Router::new()
        .route(
            "/posts",
            post(handlers::create_post::<R, S>).get(handlers::list_posts::<R, S>),
        )
        .route("/posts/{post_id}", put(handlers::edit_post::<R, S>))
        .route(
            "/posts/{post_id}/status",
            patch(handlers::publish_post::<R, S>),
        )
        .route(
            "/posts/{post_id}/images",
            post(handlers::add_image::<R, S>).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/posts/{post_id}/images/{image_id}",
            delete(handlers::delete_image::<R, S>),
        )
        .route_layer(from_fn_with_state(gate, require_bearer_auth::<U>))
        .with_state(state)
}
