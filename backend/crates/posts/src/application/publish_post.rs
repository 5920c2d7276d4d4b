//! Publish Post Use Case
//!
//! Single-purpose: the only accepted target status is `Published`.

use std::sync::Arc;

use kernel::id::{PostId, UserId};

use crate::domain::repository::PostRepository;
use crate::domain::value_objects::PostStatus;
use crate::error::{PostError, PostResult};

pub struct PublishPostUseCase<R>
where
    R: PostRepository,
{
    repo: Arc<R>,
}

impl<R> PublishPostUseCase<R>
where
    R: PostRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        post_id: PostId,
        author_id: UserId,
        status: &str,
    ) -> PostResult<&'static str> {
        // Checked before the post is even loaded
        if PostStatus::from_code(status) != Some(PostStatus::Published) {
            return Err(PostError::InvalidPostStatus(status.to_string()));
        }

        let mut post = self
            .repo
            .find_post_by_id(&post_id)
            .await?
            .ok_or(PostError::PostNotFound)?;

        if !post.is_owned_by(&author_id) {
            return Err(PostError::OwnershipViolation);
        }

        post.publish();
        self.repo.update_post_status(&post).await?;

        tracing::info!(post_id = %post.post_id, author_id = %author_id, "Post published");

        Ok("Post published successfully")
    }
}
