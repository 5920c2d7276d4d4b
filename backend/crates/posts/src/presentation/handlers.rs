//! HTTP Handlers
//!
//! Every handler sits behind the bearer gate and receives the resolved user
//! through [`CurrentUser`]. Authoring routes additionally require the
//! `Author` role.

use std::sync::Arc;

use auth::{CurrentUser, User};
use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use kernel::id::{ImageId, PostId};
use platform::object_store::ObjectStore;

use crate::application::config::PostsConfig;
use crate::application::{
    AddImageUseCase, CreatePostInput, CreatePostUseCase, DeleteImageUseCase, EditPostInput,
    EditPostUseCase, PublishPostUseCase, ViewPostsUseCase,
};
use crate::domain::repository::{ImageRepository, PostRepository};
use crate::error::{PostError, PostResult};
use crate::presentation::dto::{
    AddImageResponse, CreatePostRequest, CreatePostResponse, EditPostRequest, MessageResponse,
    PostView, PostsResponse, PublishPostRequest,
};

/// Multipart field carrying the image bytes
pub const IMAGE_FIELD: &str = "image";

/// Shared state for post handlers
#[derive(Clone)]
pub struct PostsAppState<R, S>
where
    R: PostRepository + ImageRepository + Clone + Send + Sync + 'static,
    S: ObjectStore + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub store: Arc<S>,
    pub config: Arc<PostsConfig>,
}

fn require_author(user: &User) -> PostResult<()> {
    if user.is_author() {
        Ok(())
    } else {
        Err(PostError::NoPermission)
    }
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> PostResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| PostError::IncorrectData(rejection.body_text()))
}

fn parse_post_id(raw: &str) -> PostResult<PostId> {
    raw.parse()
        .map_err(|_| PostError::IncorrectData(format!("invalid post id: {raw}")))
}

fn parse_image_id(raw: &str) -> PostResult<ImageId> {
    raw.parse()
        .map_err(|_| PostError::InvalidImageId(raw.to_string()))
}

fn message(text: &str) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: text.to_string(),
    })
}

// ============================================================================
// Posts
// ============================================================================

/// POST /posts
pub async fn create_post<R, S>(
    State(state): State<PostsAppState<R, S>>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<CreatePostRequest>, JsonRejection>,
) -> PostResult<impl IntoResponse>
where
    R: PostRepository + ImageRepository + Clone + Send + Sync + 'static,
    S: ObjectStore + Clone + Send + Sync + 'static,
{
    require_author(&user)?;
    let req = json_body(payload)?;

    let output = CreatePostUseCase::new(state.repo.clone())
        .execute(
            user.user_id,
            CreatePostInput {
                idempotency_key: req.idempotency_key,
                title: req.title,
                content: req.content,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatePostResponse {
            message: output.message.to_string(),
            post_id: output.post_id,
            status: output.status.code().to_string(),
        }),
    ))
}

/// PUT /posts/{post_id}
pub async fn edit_post<R, S>(
    State(state): State<PostsAppState<R, S>>,
    CurrentUser(user): CurrentUser,
    Path(post_id): Path<String>,
    payload: Result<Json<EditPostRequest>, JsonRejection>,
) -> PostResult<Json<MessageResponse>>
where
    R: PostRepository + ImageRepository + Clone + Send + Sync + 'static,
    S: ObjectStore + Clone + Send + Sync + 'static,
{
    require_author(&user)?;
    let post_id = parse_post_id(&post_id)?;
    let req = json_body(payload)?;

    let text = EditPostUseCase::new(state.repo.clone())
        .execute(
            post_id,
            user.user_id,
            EditPostInput {
                title: req.title,
                content: req.content,
            },
        )
        .await?;

    Ok(message(text))
}

/// PATCH /posts/{post_id}/status
pub async fn publish_post<R, S>(
    State(state): State<PostsAppState<R, S>>,
    CurrentUser(user): CurrentUser,
    Path(post_id): Path<String>,
    payload: Result<Json<PublishPostRequest>, JsonRejection>,
) -> PostResult<Json<MessageResponse>>
where
    R: PostRepository + ImageRepository + Clone + Send + Sync + 'static,
    S: ObjectStore + Clone + Send + Sync + 'static,
{
    require_author(&user)?;
    let post_id = parse_post_id(&post_id)?;
    let req = json_body(payload)?;

    let text = PublishPostUseCase::new(state.repo.clone())
        .execute(post_id, user.user_id, &req.status)
        .await?;

    Ok(message(text))
}

/// GET /posts
pub async fn list_posts<R, S>(
    State(state): State<PostsAppState<R, S>>,
    CurrentUser(user): CurrentUser,
) -> PostResult<Json<PostsResponse>>
where
    R: PostRepository + ImageRepository + Clone + Send + Sync + 'static,
    S: ObjectStore + Clone + Send + Sync + 'static,
{
    let posts = ViewPostsUseCase::new(state.repo.clone())
        .for_user(&user)
        .await?;

    Ok(Json(PostsResponse {
        posts: posts.into_iter().map(PostView::from).collect(),
    }))
}

// ============================================================================
// Images
// ============================================================================

/// POST /posts/{post_id}/images (multipart, field `image`)
pub async fn add_image<R, S>(
    State(state): State<PostsAppState<R, S>>,
    CurrentUser(user): CurrentUser,
    Path(post_id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> PostResult<impl IntoResponse>
where
    R: PostRepository + ImageRepository + Clone + Send + Sync + 'static,
    S: ObjectStore + Clone + Send + Sync + 'static,
{
    require_author(&user)?;
    let post_id = parse_post_id(&post_id)?;

    let mut multipart =
        multipart.map_err(|rejection| PostError::IncorrectData(rejection.body_text()))?;

    let mut image = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| PostError::IncorrectData(e.body_text()))?
    {
        if field.name() == Some(IMAGE_FIELD) {
            let data = field
                .bytes()
                .await
                .map_err(|e| PostError::IncorrectData(e.body_text()))?;
            image = Some(data);
            break;
        }
    }

    let data = image
        .ok_or_else(|| PostError::IncorrectData(format!("missing multipart field `{IMAGE_FIELD}`")))?;
    let size = data.len() as u64;

    let output = AddImageUseCase::new(state.repo.clone(), state.store.clone(), state.config.clone())
        .execute(post_id, user.user_id, data, size)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AddImageResponse {
            message: output.message.to_string(),
            image_id: output.image_id,
            image_url: output.image_url,
        }),
    ))
}

/// DELETE /posts/{post_id}/images/{image_id}
pub async fn delete_image<R, S>(
    State(state): State<PostsAppState<R, S>>,
    CurrentUser(user): CurrentUser,
    Path((post_id, image_id)): Path<(String, String)>,
) -> PostResult<Json<MessageResponse>>
where
    R: PostRepository + ImageRepository + Clone + Send + Sync + 'static,
    S: ObjectStore + Clone + Send + Sync + 'static,
{
    require_author(&user)?;
    let post_id = parse_post_id(&post_id)?;
    let image_id = parse_image_id(&image_id)?;

    let text = DeleteImageUseCase::new(state.repo.clone(), state.store.clone(), state.config.clone())
        .execute(post_id, image_id, user.user_id)
        .await?;

    Ok(message(text))
}
