//! Delete Image Use Case
//!
//! Missing post, missing image, an image of another post and a post owned
//! by someone else all fail with the same `PostOrImageNotFound`.
//!
//! The object is deleted before the row. If the row delete fails the row
//! dangles without its object; that case is logged, not rolled back.

use std::sync::Arc;

use kernel::id::{ImageId, PostId, UserId};
use platform::object_store::{ObjectStore, with_timeout};

use crate::application::config::PostsConfig;
use crate::domain::entities::Image;
use crate::domain::repository::{ImageRepository, PostRepository};
use crate::error::{PostError, PostResult};

pub struct DeleteImageUseCase<R, S>
where
    R: PostRepository + ImageRepository + Send + Sync + 'static,
    S: ObjectStore + Send + Sync + 'static,
{
    repo: Arc<R>,
    store: Arc<S>,
    config: Arc<PostsConfig>,
}

impl<R, S> DeleteImageUseCase<R, S>
where
    R: PostRepository + ImageRepository + Send + Sync + 'static,
    S: ObjectStore + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>, store: Arc<S>, config: Arc<PostsConfig>) -> Self {
        Self {
            repo,
            store,
            config,
        }
    }

    pub async fn execute(
        &self,
        post_id: PostId,
        image_id: ImageId,
        author_id: UserId,
    ) -> PostResult<&'static str> {
        let post = self
            .repo
            .find_post_by_id(&post_id)
            .await?
            .filter(|post| post.is_owned_by(&author_id))
            .ok_or(PostError::PostOrImageNotFound)?;

        let image = self
            .repo
            .find_image_by_id(&image_id)
            .await?
            .filter(|image| image.post_id == post.post_id)
            .ok_or(PostError::PostOrImageNotFound)?;

        let task = tokio::spawn(remove_image(
            self.repo.clone(),
            self.store.clone(),
            self.config.clone(),
            image,
        ));

        task.await
            .map_err(|e| PostError::Internal(format!("image delete task failed: {e}")))??;

        tracing::info!(
            post_id = %post_id,
            image_id = %image_id,
            author_id = %author_id,
            "Image deleted"
        );

        Ok("Image deleted successfully")
    }
}

async fn remove_image<R, S>(
    repo: Arc<R>,
    store: Arc<S>,
    config: Arc<PostsConfig>,
    image: Image,
) -> PostResult<()>
where
    R: ImageRepository + Send + Sync + 'static,
    S: ObjectStore + Send + Sync + 'static,
{
    let key = image.object_key();

    with_timeout(
        config.object_store_timeout,
        store.delete(&config.bucket, &key),
    )
    .await?;

    if let Err(e) = repo.delete_image(&image.image_id).await {
        tracing::error!(
            post_id = %image.post_id,
            image_id = %image.image_id,
            key = %key,
            error = %e,
            "Image object deleted but its row remains"
        );
        return Err(e);
    }

    Ok(())
}
