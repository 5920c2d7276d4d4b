//! Add Image Use Case
//!
//! The image row is written first with a placeholder URL, then the bytes
//! are uploaded and the presigned URL replaces the placeholder. There is
//! no rollback: if the upload or the URL step fails, the row stays behind
//! with the placeholder and is logged for manual cleanup.
//!
//! Everything after the row insert runs on a detached task, so a client
//! that disconnects does not cancel a storage call halfway.

use std::sync::Arc;

use bytes::Bytes;
use kernel::id::{ImageId, PostId, UserId};
use platform::object_store::{ObjectStore, with_timeout};

use crate::application::config::PostsConfig;
use crate::domain::entities::Image;
use crate::domain::repository::{ImageRepository, PostRepository};
use crate::domain::value_objects::IMAGE_CONTENT_TYPE;
use crate::error::{PostError, PostResult};

#[derive(Debug, Clone)]
pub struct AddImageOutput {
    pub message: &'static str,
    pub image_id: ImageId,
    pub image_url: String,
}

pub struct AddImageUseCase<R, S>
where
    R: PostRepository + ImageRepository + Send + Sync + 'static,
    S: ObjectStore + Send + Sync + 'static,
{
    repo: Arc<R>,
    store: Arc<S>,
    config: Arc<PostsConfig>,
}

impl<R, S> AddImageUseCase<R, S>
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
        author_id: UserId,
        data: Bytes,
        declared_size: u64,
    ) -> PostResult<AddImageOutput> {
        let post = self
            .repo
            .find_post_by_id(&post_id)
            .await?
            .ok_or(PostError::PostNotFound)?;

        if !post.is_owned_by(&author_id) {
            return Err(PostError::OwnershipViolation);
        }

        let image = Image::placeholder(post.post_id);
        self.repo.add_image(&image).await?;
        let image_id = image.image_id;

        let task = tokio::spawn(store_image(
            self.repo.clone(),
            self.store.clone(),
            self.config.clone(),
            image,
            data,
            declared_size,
        ));

        let image_url = task
            .await
            .map_err(|e| PostError::Internal(format!("image upload task failed: {e}")))??;

        tracing::info!(
            post_id = %post_id,
            image_id = %image_id,
            author_id = %author_id,
            size = declared_size,
            "Image added"
        );

        Ok(AddImageOutput {
            message: "Image added successfully",
            image_id,
            image_url,
        })
    }
}

async fn store_image<R, S>(
    repo: Arc<R>,
    store: Arc<S>,
    config: Arc<PostsConfig>,
    image: Image,
    data: Bytes,
    declared_size: u64,
) -> PostResult<String>
where
    R: ImageRepository + Send + Sync + 'static,
    S: ObjectStore + Send + Sync + 'static,
{
    let key = image.object_key();
    let limit = config.object_store_timeout;

    let result = async {
        with_timeout(
            limit,
            store.upload(&config.bucket, &key, data, declared_size, IMAGE_CONTENT_TYPE),
        )
        .await?;

        let url = with_timeout(
            limit,
            store.presigned_url(&config.bucket, &key, config.image_url_ttl),
        )
        .await?;

        repo.set_image_url(&image.image_id, &url).await?;
        Ok::<_, PostError>(url)
    }
    .await;

    if let Err(e) = &result {
        tracing::error!(
            post_id = %image.post_id,
            image_id = %image.image_id,
            key = %key,
            error = %e,
            "Image row left with placeholder URL"
        );
    }

    result
}
