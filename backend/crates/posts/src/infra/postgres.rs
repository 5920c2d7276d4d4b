//! PostgreSQL Post Store

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use kernel::id::{ImageId, PostId, UserId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::{Image, Post};
use crate::domain::repository::{ImageRepository, PostRepository};
use crate::domain::value_objects::{IdempotencyKey, PostStatus};
use crate::error::{PostError, PostResult};

const POST_COLUMNS: &str = r#"
    post_id,
    author_id,
    idempotency_key,
    title,
    content,
    post_status,
    created_at,
    updated_at
"#;

/// PostgreSQL-backed repository for posts and their images
#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Attach images to already-loaded post rows, preserving row order.
    async fn with_images(&self, rows: Vec<PostRow>) -> PostResult<Vec<Post>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = rows.iter().map(|r| r.post_id).collect();
        let image_rows = sqlx::query_as::<_, ImageRow>(
            r#"
            SELECT image_id, post_id, image_url, created_at
            FROM post_images
            WHERE post_id = ANY($1)
            ORDER BY created_at ASC, image_id ASC
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut images: HashMap<Uuid, Vec<Image>> = HashMap::new();
        for row in image_rows {
            images.entry(row.post_id).or_default().push(row.into_image());
        }

        rows.into_iter()
            .map(|row| {
                let post_images = images.remove(&row.post_id).unwrap_or_default();
                row.into_post(post_images)
            })
            .collect()
    }
}

// ============================================================================
// Post Repository Implementation
// ============================================================================

impl PostRepository for PgPostRepository {
    async fn create_post(&self, post: &Post) -> PostResult<()> {
        sqlx::query(
            r#"
            INSERT INTO posts (
                post_id,
                author_id,
                idempotency_key,
                title,
                content,
                post_status,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(post.post_id.as_uuid())
        .bind(post.author_id.as_uuid())
        .bind(post.idempotency_key.as_str())
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.status.id())
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                PostError::InvalidIdempotencyKey
            }
            other => PostError::Database(other),
        })?;

        Ok(())
    }

    async fn find_post_by_id(&self, post_id: &PostId) -> PostResult<Option<Post>> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE post_id = $1");
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(post_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(self.with_images(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn update_post_content(&self, post: &Post) -> PostResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET title = $2,
                content = $3,
                updated_at = $4
            WHERE post_id = $1
            "#,
        )
        .bind(post.post_id.as_uuid())
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(PostError::PostNotFound);
        }

        Ok(())
    }

    async fn update_post_status(&self, post: &Post) -> PostResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET post_status = GREATEST(post_status, $2),
                updated_at = $3
            WHERE post_id = $1
            "#,
        )
        .bind(post.post_id.as_uuid())
        .bind(post.status.id())
        .bind(post.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(PostError::PostNotFound);
        }

        Ok(())
    }

    async fn find_posts_by_author(&self, author_id: &UserId) -> PostResult<Vec<Post>> {
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE author_id = $1 ORDER BY created_at DESC"
        );
        let rows = sqlx::query_as::<_, PostRow>(&sql)
            .bind(author_id.as_uuid())
            .fetch_all(&self.pool)
            .await?;

        self.with_images(rows).await
    }

    async fn find_published_posts(&self) -> PostResult<Vec<Post>> {
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE post_status = $1 ORDER BY created_at DESC"
        );
        let rows = sqlx::query_as::<_, PostRow>(&sql)
            .bind(PostStatus::Published.id())
            .fetch_all(&self.pool)
            .await?;

        self.with_images(rows).await
    }
}

// ============================================================================
// Image Repository Implementation
// ============================================================================

impl ImageRepository for PgPostRepository {
    async fn add_image(&self, image: &Image) -> PostResult<()> {
        sqlx::query(
            r#"
            INSERT INTO post_images (image_id, post_id, image_url, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(image.image_id.as_uuid())
        .bind(image.post_id.as_uuid())
        .bind(&image.image_url)
        .bind(image.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn set_image_url(&self, image_id: &ImageId, url: &str) -> PostResult<()> {
        let result = sqlx::query("UPDATE post_images SET image_url = $2 WHERE image_id = $1")
            .bind(image_id.as_uuid())
            .bind(url)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PostError::PostOrImageNotFound);
        }

        Ok(())
    }

    async fn find_image_by_id(&self, image_id: &ImageId) -> PostResult<Option<Image>> {
        let row = sqlx::query_as::<_, ImageRow>(
            r#"
            SELECT image_id, post_id, image_url, created_at
            FROM post_images
            WHERE image_id = $1
            "#,
        )
        .bind(image_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ImageRow::into_image))
    }

    async fn delete_image(&self, image_id: &ImageId) -> PostResult<()> {
        let result = sqlx::query("DELETE FROM post_images WHERE image_id = $1")
            .bind(image_id.as_uuid())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PostError::PostOrImageNotFound);
        }

        Ok(())
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct PostRow {
    post_id: Uuid,
    author_id: Uuid,
    idempotency_key: String,
    title: String,
    content: String,
    post_status: i16,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PostRow {
    fn into_post(self, images: Vec<Image>) -> PostResult<Post> {
        let status = PostStatus::from_id(self.post_status).ok_or_else(|| {
            PostError::Internal(format!("Invalid post_status id: {}", self.post_status))
        })?;

        Ok(Post {
            post_id: PostId::from(self.post_id),
            author_id: UserId::from(self.author_id),
            idempotency_key: IdempotencyKey::from_db(self.idempotency_key),
            title: self.title,
            content: self.content,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
            images,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ImageRow {
    image_id: Uuid,
    post_id: Uuid,
    image_url: String,
    created_at: DateTime<Utc>,
}

impl ImageRow {
    fn into_image(self) -> Image {
        Image {
            image_id: ImageId::from(self.image_id),
            post_id: PostId::from(self.post_id),
            image_url: self.image_url,
            created_at: self.created_at,
        }
    }
}
