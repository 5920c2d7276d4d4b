//! Domain Entities

use chrono::{DateTime, Utc};
use kernel::id::{ImageId, PostId, UserId};

use super::value_objects::{IdempotencyKey, PLACEHOLDER_IMAGE_URL, PostStatus, image_object_key};

/// A blog post and its images (images ordered oldest first)
#[derive(Debug, Clone)]
pub struct Post {
    pub post_id: PostId,
    /// Immutable after creation
    pub author_id: UserId,
    pub idempotency_key: IdempotencyKey,
    pub title: String,
    pub content: String,
    pub status: PostStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub images: Vec<Image>,
}

impl Post {
    /// New posts always start as drafts
    pub fn new(
        author_id: UserId,
        idempotency_key: IdempotencyKey,
        title: String,
        content: String,
    ) -> Self {
        let now = Utc::now();

        Self {
            post_id: PostId::new(),
            author_id,
            idempotency_key,
            title,
            content,
            status: PostStatus::Draft,
            created_at: now,
            updated_at: now,
            images: Vec::new(),
        }
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        self.author_id == *user_id
    }

    /// Full overwrite of title and content
    pub fn edit(&mut self, title: String, content: String) {
        self.title = title;
        self.content = content;
        self.updated_at = Utc::now();
    }

    pub fn publish(&mut self) {
        self.status = PostStatus::Published;
        self.updated_at = Utc::now();
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub image_id: ImageId,
    pub post_id: PostId,
    /// [`PLACEHOLDER_IMAGE_URL`] until the upload finishes
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

impl Image {
    pub fn placeholder(post_id: PostId) -> Self {
        Self {
            image_id: ImageId::new(),
            post_id,
            image_url: PLACEHOLDER_IMAGE_URL.to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn object_key(&self) -> String {
        image_object_key(&self.post_id, &self.image_id)
    }

    pub fn has_url(&self) -> bool {
        self.image_url != PLACEHOLDER_IMAGE_URL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> Post {
        Post::new(
            UserId::new(),
            IdempotencyKey::new("k1").unwrap(),
            "T".to_string(),
            "C".to_string(),
        )
    }

    #[test]
    fn test_new_post_is_draft() {
        let post = draft();
        assert_eq!(post.status, PostStatus::Draft);
        assert_eq!(post.created_at, post.updated_at);
        assert!(post.images.is_empty());
    }

    #[test]
    fn test_edit_keeps_status_and_created_at() {
        let mut post = draft();
        let created_at = post.created_at;
        post.edit("T2".to_string(), "C2".to_string());

        assert_eq!(post.title, "T2");
        assert_eq!(post.content, "C2");
        assert_eq!(post.status, PostStatus::Draft);
        assert_eq!(post.created_at, created_at);
        assert!(post.updated_at >= created_at);
    }

    #[test]
    fn test_publish() {
        let mut post = draft();
        post.publish();
        assert!(post.is_published());
        assert_eq!(post.title, "T");
    }

    #[test]
    fn test_ownership() {
        let post = draft();
        assert!(post.is_owned_by(&post.author_id));
        assert!(!post.is_owned_by(&UserId::new()));
    }

    #[test]
    fn test_placeholder_image() {
        let post = draft();
        let image = Image::placeholder(post.post_id);
        assert!(!image.has_url());
        assert_eq!(image.post_id, post.post_id);
        assert!(image.object_key().ends_with(".png"));
        assert!(image.object_key().starts_with(&post.post_id.to_string()));
    }
}
