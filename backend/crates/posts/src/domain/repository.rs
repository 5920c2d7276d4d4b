//! Repository Traits - Post Store interfaces
//!
//! Implementations enforce idempotency-key uniqueness themselves and report
//! a violation as `PostError::InvalidIdempotencyKey`.

use kernel::id::{ImageId, PostId, UserId};

use super::entities::{Image, Post};
use crate::error::PostResult;

#[trait_variant::make(PostRepository: Send)]
pub trait LocalPostRepository {
    /// Insert a post. A reused idempotency key is `InvalidIdempotencyKey`.
    async fn create_post(&self, post: &Post) -> PostResult<()>;

    /// Load a post together with its images
    async fn find_post_by_id(&self, post_id: &PostId) -> PostResult<Option<Post>>;

    /// Write title, content and `updated_at` only; status is never touched.
    async fn update_post_content(&self, post: &Post) -> PostResult<()>;

    /// Move the stored status forward to `post.status`. A stored status is
    /// never lowered.
    async fn update_post_status(&self, post: &Post) -> PostResult<()>;

    /// All posts of one author, any status, newest first
    async fn find_posts_by_author(&self, author_id: &UserId) -> PostResult<Vec<Post>>;

    /// Published posts of every author, newest first
    async fn find_published_posts(&self) -> PostResult<Vec<Post>>;
}

#[trait_variant::make(ImageRepository: Send)]
pub trait LocalImageRepository {
    async fn add_image(&self, image: &Image) -> PostResult<()>;

    async fn set_image_url(&self, image_id: &ImageId, url: &str) -> PostResult<()>;

    async fn find_image_by_id(&self, image_id: &ImageId) -> PostResult<Option<Image>>;

    async fn delete_image(&self, image_id: &ImageId) -> PostResult<()>;
}
