//! Object Storage
//!
//! Blob storage behind the [`ObjectStore`] trait, with an S3 implementation
//! that works against AWS or MinIO (path-style addressing).
//!
//! Buckets are created lazily by [`ObjectStore::upload`]. Presigning and
//! deleting never create a bucket; they fail with
//! [`ObjectStoreError::BucketNotFound`] instead.

use std::future::Future;
use std::time::Duration;

use bytes::Bytes;
use s3::creds::Credentials;
use s3::{Bucket, BucketConfiguration, Region};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObjectStoreError {
    #[error("Bucket not found: {0}")]
    BucketNotFound(String),

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Presigned URL generation failed: {0}")]
    PresignedUrl(String),

    #[error("Delete failed: {0}")]
    Delete(String),

    #[error("Object store operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Object store misconfigured: {0}")]
    Configuration(String),
}

/// Blob storage used for post images
#[trait_variant::make(ObjectStore: Send)]
pub trait LocalObjectStore {
    /// Store `data` under `key`, creating the bucket if needed.
    /// Returns a `bucket/key` locator.
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        size_hint: u64,
        content_type: &str,
    ) -> Result<String, ObjectStoreError>;

    /// Time-limited GET URL for an object
    async fn presigned_url(
        &self,
        bucket: &str,
        key: &str,
        ttl: Duration,
    ) -> Result<String, ObjectStoreError>;

    async fn delete(&self, bucket: &str, key: &str) -> Result<(), ObjectStoreError>;
}

/// Run an object-store call with its own deadline.
pub async fn with_timeout<T, F>(limit: Duration, operation: F) -> Result<T, ObjectStoreError>
where
    F: Future<Output = Result<T, ObjectStoreError>>,
{
    match tokio::time::timeout(limit, operation).await {
        Ok(result) => result,
        Err(_) => Err(ObjectStoreError::Timeout(limit)),
    }
}

// ============================================================================
// S3 / MinIO
// ============================================================================

/// Connection settings for an S3-compatible endpoint
#[derive(Clone)]
pub struct S3Settings {
    /// e.g. `http://localhost:9000`
    pub endpoint: String,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
}

impl std::fmt::Debug for S3Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Settings")
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .field("access_key", &self.access_key)
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

#[derive(Clone)]
pub struct S3ObjectStore {
    region: Region,
    credentials: Credentials,
}

impl S3ObjectStore {
    pub fn new(settings: &S3Settings) -> Result<Self, ObjectStoreError> {
        let credentials = Credentials::new(
            Some(settings.access_key.as_str()),
            Some(settings.secret_key.as_str()),
            None,
            None,
            None,
        )
        .map_err(|e| ObjectStoreError::Configuration(e.to_string()))?;

        let region = Region::Custom {
            region: settings.region.clone(),
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
        };

        Ok(Self {
            region,
            credentials,
        })
    }

    fn bucket(&self, name: &str) -> Result<Box<Bucket>, ObjectStoreError> {
        Bucket::new(name, self.region.clone(), self.credentials.clone())
            .map(|bucket| bucket.with_path_style())
            .map_err(|e| ObjectStoreError::Configuration(e.to_string()))
    }

    /// `wrap` classifies a failure of the existence check itself.
    async fn existing_bucket(
        &self,
        name: &str,
        wrap: fn(String) -> ObjectStoreError,
    ) -> Result<Box<Bucket>, ObjectStoreError> {
        let bucket = self.bucket(name)?;
        let exists = bucket.exists().await.map_err(|e| wrap(e.to_string()))?;
        if !exists {
            return Err(ObjectStoreError::BucketNotFound(name.to_string()));
        }
        Ok(bucket)
    }

    async fn ensure_bucket(&self, name: &str) -> Result<Box<Bucket>, ObjectStoreError> {
        let bucket = self.bucket(name)?;
        let exists = bucket
            .exists()
            .await
            .map_err(|e| ObjectStoreError::Upload(e.to_string()))?;

        if !exists {
            Bucket::create_with_path_style(
                name,
                self.region.clone(),
                self.credentials.clone(),
                BucketConfiguration::default(),
            )
            .await
            .map_err(|e| ObjectStoreError::Upload(format!("creating bucket {name}: {e}")))?;
            tracing::info!(bucket = %name, "Created object store bucket");
        }

        Ok(bucket)
    }
}

impl ObjectStore for S3ObjectStore {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        size_hint: u64,
        content_type: &str,
    ) -> Result<String, ObjectStoreError> {
        if data.len() as u64 != size_hint {
            tracing::debug!(
                bucket = %bucket,
                key = %key,
                size_hint,
                actual = data.len(),
                "Upload size differs from declared size"
            );
        }

        let target = self.ensure_bucket(bucket).await?;
        target
            .put_object_with_content_type(key, &data, content_type)
            .await
            .map_err(|e| ObjectStoreError::Upload(e.to_string()))?;

        Ok(format!("{bucket}/{key}"))
    }

    async fn presigned_url(
        &self,
        bucket: &str,
        key: &str,
        ttl: Duration,
    ) -> Result<String, ObjectStoreError> {
        let target = self
            .existing_bucket(bucket, ObjectStoreError::PresignedUrl)
            .await?;
        let expiry_secs = u32::try_from(ttl.as_secs())
            .map_err(|_| ObjectStoreError::PresignedUrl(format!("ttl too large: {ttl:?}")))?;

        target
            .presign_get(key, expiry_secs, None)
            .await
            .map_err(|e| ObjectStoreError::PresignedUrl(e.to_string()))
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<(), ObjectStoreError> {
        let target = self
            .existing_bucket(bucket, ObjectStoreError::Delete)
            .await?;
        target
            .delete_object(key)
            .await
            .map_err(|e| ObjectStoreError::Delete(e.to_string()))?;
        Ok(())
    }
}
