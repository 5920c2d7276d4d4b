//! View Posts Use Case

use std::sync::Arc;

use auth::{User, UserRole};
use kernel::id::UserId;

use crate::domain::entities::Post;
use crate::domain::repository::PostRepository;
use crate::error::PostResult;

pub struct ViewPostsUseCase<R>
where
    R: PostRepository,
{
    repo: Arc<R>,
}

impl<R> ViewPostsUseCase<R>
where
    R: PostRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// An author's own dashboard: drafts included
    pub async fn by_author(&self, author_id: &UserId) -> PostResult<Vec<Post>> {
        self.repo.find_posts_by_author(author_id).await
    }

    /// The public view: published posts only
    pub async fn all_published(&self) -> PostResult<Vec<Post>> {
        self.repo.find_published_posts().await
    }

    /// Authors see their own posts, readers see everything published.
    pub async fn for_user(&self, user: &User) -> PostResult<Vec<Post>> {
        match user.user_role {
            UserRole::Author => self.by_author(&user.user_id).await,
            UserRole::Reader => self.all_published().await,
        }
    }
}
