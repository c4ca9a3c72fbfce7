//! In-memory repositories - used when no database is configured and in tests.
//!
//! All repositories handed out by one [`InMemoryDatabase`] share the same
//! tables and enforce the same uniqueness and reference rules as the
//! PostgreSQL schema. Data is lost on process restart.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Comment, Like, Page, Pagination, Post, User};
use quill_core::error::RepoError;
use quill_core::ports::{
    BaseRepository, CommentRepository, LikeRepository, PostRepository, UserRepository,
};

#[derive(Default)]
struct Tables {
    // Rows are kept in insertion order.
    users: Vec<User>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
    likes: Vec<Like>,
}

impl Tables {
    fn user_exists(&self, id: Uuid) -> bool {
        self.users.iter().any(|u| u.id == id)
    }

    fn post_exists(&self, id: Uuid) -> bool {
        self.posts.iter().any(|p| p.id == id)
    }
}

type SharedTables = Arc<RwLock<Tables>>;

/// Sort rows newest first; rows created at the same instant keep
/// reverse insertion order.
fn newest_first<'a, T, F>(rows: impl DoubleEndedIterator<Item = &'a T>, created_at: F) -> Vec<&'a T>
where
    T: 'a,
    F: Fn(&T) -> chrono::DateTime<chrono::Utc>,
{
    let mut rows: Vec<&T> = rows.rev().collect();
    rows.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    rows
}

fn window<T: Clone>(rows: Vec<&T>, pagination: Pagination) -> Page<T> {
    let total = rows.len() as u64;
    let items = rows
        .into_iter()
        .skip(pagination.offset() as usize)
        .take(pagination.limit() as usize)
        .cloned()
        .collect();

    Page::new(items, total)
}

fn count_by(post_ids: &[Uuid], rows: impl Iterator<Item = Uuid>) -> HashMap<Uuid, u64> {
    let wanted: HashSet<Uuid> = post_ids.iter().copied().collect();
    let mut counts = HashMap::new();
    for post_id in rows.filter(|id| wanted.contains(id)) {
        *counts.entry(post_id).or_insert(0) += 1;
    }
    counts
}

/// Handle to a set of in-memory tables.
#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    tables: SharedTables,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryUserRepository {
            tables: self.tables.clone(),
        }
    }

    pub fn posts(&self) -> InMemoryPostRepository {
        InMemoryPostRepository {
            tables: self.tables.clone(),
        }
    }

    pub fn comments(&self) -> InMemoryCommentRepository {
        InMemoryCommentRepository {
            tables: self.tables.clone(),
        }
    }

    pub fn likes(&self) -> InMemoryLikeRepository {
        InMemoryLikeRepository {
            tables: self.tables.clone(),
        }
    }

    /// Number of like rows, across all posts.
    pub async fn like_rows(&self) -> usize {
        self.tables.read().await.likes.len()
    }
}

pub struct InMemoryUserRepository {
    tables: SharedTables,
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;

        if tables.users.iter().any(|u| u.id == user.id) {
            return Err(RepoError::Constraint("users_pkey".to_string()));
        }
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(RepoError::Constraint("users_email_key".to_string()));
        }

        tables.users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;

        if tables
            .users
            .iter()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(RepoError::Constraint("users_email_key".to_string()));
        }

        let row = tables
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(RepoError::NotFound)?;
        *row = user.clone();

        Ok(user)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }
}

pub struct InMemoryPostRepository {
    tables: SharedTables,
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;

        if !tables.user_exists(post.author_id) {
            return Err(RepoError::Constraint("posts_user_id_fkey".to_string()));
        }
        if tables.post_exists(post.id) {
            return Err(RepoError::Constraint("posts_pkey".to_string()));
        }

        tables.posts.push(post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;

        let row = tables
            .posts
            .iter_mut()
            .find(|p| p.id == post.id)
            .ok_or(RepoError::NotFound)?;
        *row = post.clone();

        Ok(post)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_page(&self, pagination: Pagination) -> Result<Page<Post>, RepoError> {
        let tables = self.tables.read().await;
        let rows = newest_first(tables.posts.iter(), |p| p.created_at);

        Ok(window(rows, pagination))
    }
}

pub struct InMemoryCommentRepository {
    tables: SharedTables,
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryCommentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.comments.iter().find(|c| c.id == id).cloned())
    }

    async fn insert(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;

        if !tables.post_exists(comment.post_id) {
            return Err(RepoError::Constraint("comments_post_id_fkey".to_string()));
        }
        if !tables.user_exists(comment.author_id) {
            return Err(RepoError::Constraint("comments_user_id_fkey".to_string()));
        }

        tables.comments.push(comment.clone());
        Ok(comment)
    }

    async fn update(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;

        let row = tables
            .comments
            .iter_mut()
            .find(|c| c.id == comment.id)
            .ok_or(RepoError::NotFound)?;
        *row = comment.clone();

        Ok(comment)
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn find_page_by_post(
        &self,
        post_id: Uuid,
        pagination: Pagination,
    ) -> Result<Page<Comment>, RepoError> {
        let tables = self.tables.read().await;
        let rows = newest_first(
            tables.comments.iter().filter(|c| c.post_id == post_id),
            |c| c.created_at,
        );

        Ok(window(rows, pagination))
    }

    async fn count_by_posts(&self, post_ids: &[Uuid]) -> Result<HashMap<Uuid, u64>, RepoError> {
        let tables = self.tables.read().await;
        Ok(count_by(post_ids, tables.comments.iter().map(|c| c.post_id)))
    }
}

pub struct InMemoryLikeRepository {
    tables: SharedTables,
}

#[async_trait]
impl LikeRepository for InMemoryLikeRepository {
    async fn exists(&self, user_id: Uuid, post_id: Uuid) -> Result<bool, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .likes
            .iter()
            .any(|l| l.user_id == user_id && l.post_id == post_id))
    }

    async fn insert(&self, like: Like) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;

        if !tables.user_exists(like.user_id) {
            return Err(RepoError::Constraint("likes_user_id_fkey".to_string()));
        }
        if !tables.post_exists(like.post_id) {
            return Err(RepoError::Constraint("likes_post_id_fkey".to_string()));
        }
        if tables
            .likes
            .iter()
            .any(|l| l.user_id == like.user_id && l.post_id == like.post_id)
        {
            return Err(RepoError::Constraint("likes_pkey".to_string()));
        }

        tables.likes.push(like);
        Ok(())
    }

    async fn delete(&self, user_id: Uuid, post_id: Uuid) -> Result<bool, RepoError> {
        let mut tables = self.tables.write().await;
        let before = tables.likes.len();
        tables
            .likes
            .retain(|l| !(l.user_id == user_id && l.post_id == post_id));

        Ok(tables.likes.len() < before)
    }

    async fn count_by_posts(&self, post_ids: &[Uuid]) -> Result<HashMap<Uuid, u64>, RepoError> {
        let tables = self.tables.read().await;
        Ok(count_by(post_ids, tables.likes.iter().map(|l| l.post_id)))
    }

    async fn liked_by_user(
        &self,
        user_id: Uuid,
        post_ids: &[Uuid],
    ) -> Result<HashSet<Uuid>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .likes
            .iter()
            .filter(|l| l.user_id == user_id && post_ids.contains(&l.post_id))
            .map(|l| l.post_id)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seed_user(db: &InMemoryDatabase, email: &str) -> User {
        db.users()
            .insert(User::new("Test".to_string(), email.to_string(), "hash".to_string()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_email_is_constraint_violation() {
        let db = InMemoryDatabase::new();
        seed_user(&db, "a@example.com").await;

        let result = db
            .users()
            .insert(User::new("Other".into(), "a@example.com".into(), "hash".into()))
            .await;

        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_like_pair_is_unique() {
        let db = InMemoryDatabase::new();
        let user = seed_user(&db, "a@example.com").await;
        let post = db
            .posts()
            .insert(Post::new(user.id, "T".into(), "C".into()))
            .await
            .unwrap();

        let likes = db.likes();
        likes.insert(Like::new(user.id, post.id)).await.unwrap();
        let second = likes.insert(Like::new(user.id, post.id)).await;

        assert!(matches!(second, Err(RepoError::Constraint(_))));
        assert_eq!(db.like_rows().await, 1);
    }

    #[tokio::test]
    async fn test_like_requires_existing_post() {
        let db = InMemoryDatabase::new();
        let user = seed_user(&db, "a@example.com").await;

        let result = db.likes().insert(Like::new(user.id, Uuid::new_v4())).await;

        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_like_reports_false() {
        let db = InMemoryDatabase::new();
        assert!(!db.likes().delete(Uuid::new_v4(), Uuid::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn test_find_page_orders_newest_first() {
        let db = InMemoryDatabase::new();
        let user = seed_user(&db, "a@example.com").await;
        let posts = db.posts();
        for i in 0..3 {
            posts
                .insert(Post::new(user.id, format!("Post {i}"), "C".into()))
                .await
                .unwrap();
        }

        let page = posts.find_page(Pagination::new(Some(1), Some(2))).await.unwrap();

        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].title, "Post 2");
        assert_eq!(page.items[1].title, "Post 1");
    }
}
