//! Create Post Use Case

use std::sync::Arc;

use kernel::id::{PostId, UserId};

use crate::domain::entities::Post;
use crate::domain::repository::PostRepository;
use crate::domain::value_objects::{IdempotencyKey, PostStatus};
use crate::error::PostResult;

#[derive(Debug, Clone)]
pub struct CreatePostInput {
    pub idempotency_key: String,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct CreatePostOutput {
    pub message: &'static str,
    pub post_id: PostId,
    pub status: PostStatus,
}

pub struct CreatePostUseCase<R>
where
    R: PostRepository,
{
    repo: Arc<R>,
}

impl<R> CreatePostUseCase<R>
where
    R: PostRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// A repeated idempotency key is rejected by the store, so concurrent
    /// duplicates resolve to a single post.
    pub async fn execute(
        &self,
        author_id: UserId,
        input: CreatePostInput,
    ) -> PostResult<CreatePostOutput> {
        let key = IdempotencyKey::new(input.idempotency_key)?;
        let post = Post::new(author_id, key, input.title, input.content);

        self.repo.create_post(&post).await?;

        tracing::info!(
            post_id = %post.post_id,
            author_id = %post.author_id,
            idempotency_key = %post.idempotency_key.as_str(),
            "Post created"
        );

        Ok(CreatePostOutput {
            message: "Post created successfully",
            post_id: post.post_id,
            status: post.status,
        })
    }
}
