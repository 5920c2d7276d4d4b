//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and infrastructure.
//! Every use case takes the acting user's id explicitly.

pub mod add_image;
pub mod config;
pub mod create_post;
pub mod delete_image;
pub mod edit_post;
pub mod publish_post;
pub mod view_posts;

pub use add_image::{AddImageOutput, AddImageUseCase};
pub use config::PostsConfig;
pub use create_post::{CreatePostInput, CreatePostOutput, CreatePostUseCase};
pub use delete_image::DeleteImageUseCase;
pub use edit_post::{EditPostInput, EditPostUseCase};
pub use publish_post::PublishPostUseCase;
pub use view_posts::ViewPostsUseCase;
