//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use kernel::id::{ImageId, PostId, UserId};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Image, Post};

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub idempotency_key: String,
    pub title: String,
    pub content: String,
}

/// Full replacement of both fields
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditPostRequest {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishPostRequest {
    /// Must be exactly "Published"
    pub status: String,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostResponse {
    pub message: String,
    pub post_id: PostId,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddImageResponse {
    pub message: String,
    pub image_id: ImageId,
    pub image_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageView {
    pub image_id: ImageId,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub post_id: PostId,
    pub author_id: UserId,
    pub title: String,
    pub content: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub images: Vec<ImageView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostsResponse {
    pub posts: Vec<PostView>,
}

impl From<Image> for ImageView {
    fn from(image: Image) -> Self {
        Self {
            image_id: image.image_id,
            image_url: image.image_url,
            created_at: image.created_at,
        }
    }
}

impl From<Post> for PostView {
    fn from(post: Post) -> Self {
        Self {
            post_id: post.post_id,
            author_id: post.author_id,
            title: post.title,
            content: post.content,
            status: post.status.code().to_string(),
            created_at: post.created_at,
            updated_at: post.updated_at,
            images: post.images.into_iter().map(ImageView::from).collect(),
        }
    }
}
