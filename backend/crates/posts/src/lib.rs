//! Posts Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Post and Image entities, status, Post Store traits
//! - `application/` - Use cases (create, edit, publish, view, images)
//! - `infra/` - PostgreSQL Post Store
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Lifecycle
//! - Posts are created as `Draft` and can only move to `Published`
//! - Only the author may edit, publish or manage images of a post
//! - Creation is idempotent per caller-supplied key (enforced by the store)
//!
//! ## Images
//! - Stored in the object store under `{postId}/{imageId}.png`
//! - The image row exists before the upload; a failed upload leaves it with
//!   a placeholder URL (logged, not rolled back)

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::PostsConfig;
pub use error::{PostError, PostResult};
pub use infra::postgres::PgPostRepository;
pub use presentation::router::{posts_router, posts_router_generic};
