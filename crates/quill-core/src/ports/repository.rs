use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, Like, Page, Pagination, Post, User};
use crate::error::RepoError;

/// Generic repository trait for single-key entities.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity. `RepoError::NotFound` if it does not exist.
    async fn update(&self, entity: T) -> Result<T, RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Load several users at once. Unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Posts newest first, windowed, with the total number of posts.
    async fn find_page(&self, pagination: Pagination) -> Result<Page<Post>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Comments of one post newest first, windowed, with the post's total.
    async fn find_page_by_post(
        &self,
        post_id: Uuid,
        pagination: Pagination,
    ) -> Result<Page<Comment>, RepoError>;

    /// Comment counts keyed by post id. Posts without comments are absent.
    async fn count_by_posts(&self, post_ids: &[Uuid]) -> Result<HashMap<Uuid, u64>, RepoError>;
}

/// Like repository. Enforces uniqueness of `(user_id, post_id)`.
#[async_trait]
pub trait LikeRepository: Send + Sync {
    async fn exists(&self, user_id: Uuid, post_id: Uuid) -> Result<bool, RepoError>;

    /// Insert a like. `RepoError::Constraint` if the pair already exists or
    /// either side is missing.
    async fn insert(&self, like: Like) -> Result<(), RepoError>;

    /// Delete a like. Returns `false` when there was nothing to delete.
    async fn delete(&self, user_id: Uuid, post_id: Uuid) -> Result<bool, RepoError>;

    /// Like counts keyed by post id. Posts without likes are absent.
    async fn count_by_posts(&self, post_ids: &[Uuid]) -> Result<HashMap<Uuid, u64>, RepoError>;

    /// The subset of `post_ids` liked by `user_id`.
    async fn liked_by_user(
        &self,
        user_id: Uuid,
        post_ids: &[Uuid],
    ) -> Result<HashSet<Uuid>, RepoError>;
}
