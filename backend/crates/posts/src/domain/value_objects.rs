//! Post value objects

use derive_more::Display;
use kernel::id::{ImageId, PostId};
use serde::{Deserialize, Serialize};

use crate::error::{PostError, PostResult};

/// URL stored on an image row until its upload has completed
pub const PLACEHOLDER_IMAGE_URL: &str = "not-set";

/// Every uploaded image is stored as PNG, whatever was sent
pub const IMAGE_CONTENT_TYPE: &str = "image/png";

const IDEMPOTENCY_KEY_MAX_LENGTH: usize = 255;

/// Draft -> Published, never back.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i16)]
pub enum PostStatus {
    #[display("Draft")]
    Draft = 0,
    #[display("Published")]
    Published = 1,
}

impl PostStatus {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            PostStatus::Draft => "Draft",
            PostStatus::Published => "Published",
        }
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(PostStatus::Draft),
            1 => Some(PostStatus::Published),
            _ => None,
        }
    }

    /// Exact match only
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "Draft" => Some(PostStatus::Draft),
            "Published" => Some(PostStatus::Published),
            _ => None,
        }
    }
}

/// Caller-chosen key that makes post creation idempotent
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdempotencyKey(String);

impl IdempotencyKey {
    pub fn new(key: impl Into<String>) -> PostResult<Self> {
        let key = key.into();
        let trimmed = key.trim();

        if trimmed.is_empty() {
            return Err(PostError::IncorrectData(
                "idempotencyKey cannot be empty".to_string(),
            ));
        }
        if trimmed.len() > IDEMPOTENCY_KEY_MAX_LENGTH {
            return Err(PostError::IncorrectData(format!(
                "idempotencyKey must be at most {IDEMPOTENCY_KEY_MAX_LENGTH} bytes"
            )));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn from_db(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Object-store key for an image: `{postId}/{imageId}.png`
pub fn image_object_key(post_id: &PostId, image_id: &ImageId) -> String {
    format!("{post_id}/{image_id}.png")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(PostStatus::from_code("Published"), Some(PostStatus::Published));
        assert_eq!(PostStatus::from_code("Draft"), Some(PostStatus::Draft));
        for bad in ["published", "PUBLISHED", "Archived", "", " Published"] {
            assert_eq!(PostStatus::from_code(bad), None, "{bad:?}");
        }
    }

    #[test]
    fn test_status_ids() {
        for status in [PostStatus::Draft, PostStatus::Published] {
            assert_eq!(PostStatus::from_id(status.id()), Some(status));
            assert_eq!(status.to_string(), status.code());
        }
        assert_eq!(PostStatus::from_id(2), None);
    }

    #[test]
    fn test_idempotency_key() {
        assert_eq!(IdempotencyKey::new(" k1 ").unwrap().as_str(), "k1");
        assert!(matches!(
            IdempotencyKey::new("   "),
            Err(PostError::IncorrectData(_))
        ));
        assert!(IdempotencyKey::new("k".repeat(256)).is_err());
    }

    #[test]
    fn test_image_object_key() {
        let post_id: PostId = "6f1c2b9e-0d7a-4a53-9d0b-6b5e6f3a9c11".parse().unwrap();
        let image_id: ImageId = "0e7d5c44-31b6-4a6f-8f0c-2c1f9e8b7a65".parse().unwrap();
        assert_eq!(
            image_object_key(&post_id, &image_id),
            "6f1c2b9e-0d7a-4a53-9d0b-6b5e6f3a9c11/0e7d5c44-31b6-4a6f-8f0c-2c1f9e8b7a65.png"
        );
    }
}
