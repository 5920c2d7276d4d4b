//! Application Configuration
//!
//! Configuration for the Posts application layer.

use std::time::Duration;

/// Posts application configuration
#[derive(Debug, Clone)]
pub struct PostsConfig {
    /// Object-store bucket holding post images
    pub bucket: String,
    /// Deadline for each object-store call
    pub object_store_timeout: Duration,
    /// Validity of the presigned image URLs stored on images
    pub image_url_ttl: Duration,
    /// Request body limit for image uploads
    pub max_upload_bytes: usize,
}

impl Default for PostsConfig {
    fn default() -> Self {
        Self {
            bucket: "data".to_string(),
            object_store_timeout: Duration::from_secs(30),
            image_url_ttl: Duration::from_secs(7 * 24 * 3600),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl PostsConfig {
    /// Same defaults with a different bucket
    pub fn with_bucket(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PostsConfig::default();
        assert_eq!(config.bucket, "data");
        assert_eq!(config.object_store_timeout, Duration::from_secs(30));
        assert_eq!(config.image_url_ttl, Duration::from_secs(604_800));
        assert_eq!(config.max_upload_bytes, 10_485_760);
    }

    #[test]
    fn test_with_bucket() {
        let config = PostsConfig::with_bucket("images");
        assert_eq!(config.bucket, "images");
        assert_eq!(config.object_store_timeout, Duration::from_secs(30));
    }
}
