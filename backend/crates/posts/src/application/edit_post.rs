//! Edit Post Use Case

use std::sync::Arc;

use kernel::id::{PostId, UserId};

use crate::domain::repository::PostRepository;
use crate::error::{PostError, PostResult};

#[derive(Debug, Clone)]
pub struct EditPostInput {
    pub title: String,
    pub content: String,
}

pub struct EditPostUseCase<R>
where
    R: PostRepository,
{
    repo: Arc<R>,
}

impl<R> EditPostUseCase<R>
where
    R: PostRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Concurrent edits are last-writer-wins.
    pub async fn execute(
        &self,
        post_id: PostId,
        author_id: UserId,
        input: EditPostInput,
    ) -> PostResult<&'static str> {
        let mut post = self
            .repo
            .find_post_by_id(&post_id)
            .await?
            .ok_or(PostError::PostNotFound)?;

        if !post.is_owned_by(&author_id) {
            return Err(PostError::OwnershipViolation);
        }

        post.edit(input.title, input.content);
        self.repo.update_post_content(&post).await?;

        tracing::info!(post_id = %post.post_id, author_id = %author_id, "Post edited");

        Ok("Post edited successfully")
    }
}
