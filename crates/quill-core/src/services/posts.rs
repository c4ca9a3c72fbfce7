//! Post lifecycle: listing with aggregates, creation, updates and likes.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{
    Author, Like, NewPost, Page, Pagination, Post, PostChanges, PostView, User,
};
use crate::error::{DomainError, DomainResult, RepoError};
use crate::ports::{CommentRepository, LikeRepository, PostRepository, UserRepository};

/// Mediates all post operations and the cross-entity rules the store
/// cannot express alone.
///
/// Ownership is not checked here; callers run
/// [`AuthorizationChecker`](super::AuthorizationChecker) first.
pub struct PostsService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
    comments: Arc<dyn CommentRepository>,
    likes: Arc<dyn LikeRepository>,
}

impl PostsService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        comments: Arc<dyn CommentRepository>,
        likes: Arc<dyn LikeRepository>,
    ) -> Self {
        Self {
            posts,
            users,
            comments,
            likes,
        }
    }

    /// A page of posts, newest first, annotated for `viewer`.
    pub async fn list_posts(
        &self,
        pagination: Pagination,
        viewer: Option<Uuid>,
    ) -> DomainResult<Page<PostView>> {
        let page = self.posts.find_page(pagination).await?;
        let items = self.annotate(page.items, viewer).await?;

        Ok(Page::new(items, page.total))
    }

    pub async fn get_post(&self, id: Uuid, viewer: Option<Uuid>) -> DomainResult<PostView> {
        let post = self.find_post(id).await?;
        self.annotate_one(post, viewer).await
    }

    /// Load the bare post row, failing with `NotFound` if absent.
    pub async fn find_post(&self, id: Uuid) -> DomainResult<Post> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(id))
    }

    pub async fn create_post(&self, author_id: Uuid, input: NewPost) -> DomainResult<PostView> {
        let author = self
            .users
            .find_by_id(author_id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(author_id))?;

        let post = self
            .posts
            .insert(Post::new(author_id, input.title, input.content))
            .await?;

        tracing::info!(post_id = %post.id, author_id = %author_id, "Post created");

        Ok(PostView {
            post,
            author: Author::from(&author),
            likes_count: 0,
            comments_count: 0,
            is_liked: Some(false),
        })
    }

    pub async fn update_post(&self, id: Uuid, changes: PostChanges) -> DomainResult<PostView> {
        let mut post = self.find_post(id).await?;
        post.apply(changes);

        let post = self.posts.update(post).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::post_not_found(id),
            other => other.into(),
        })?;

        tracing::info!(post_id = %id, "Post updated");
        self.annotate_one(post, None).await
    }

    /// Like a post. Liking twice is a no-op.
    pub async fn like_post(&self, post_id: Uuid, user_id: Uuid) -> DomainResult<()> {
        self.find_post(post_id).await?;

        if self.likes.exists(user_id, post_id).await? {
            tracing::debug!(post_id = %post_id, user_id = %user_id, "Post already liked");
            return Ok(());
        }

        match self.likes.insert(Like::new(user_id, post_id)).await {
            Ok(()) => {
                tracing::info!(post_id = %post_id, user_id = %user_id, "Like added");
                Ok(())
            }
            // A concurrent like for the same pair won the insert.
            Err(RepoError::Constraint(msg)) => {
                if self.likes.exists(user_id, post_id).await? {
                    tracing::debug!(post_id = %post_id, user_id = %user_id, "Like raced");
                    Ok(())
                } else {
                    Err(RepoError::Constraint(msg).into())
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Remove a like. Fails with `CannotRemoveLike` if the user never liked the post.
    pub async fn unlike_post(&self, post_id: Uuid, user_id: Uuid) -> DomainResult<()> {
        self.find_post(post_id).await?;

        if !self.likes.delete(user_id, post_id).await? {
            return Err(DomainError::CannotRemoveLike { post_id, user_id });
        }

        tracing::info!(post_id = %post_id, user_id = %user_id, "Like removed");
        Ok(())
    }

    async fn annotate_one(&self, post: Post, viewer: Option<Uuid>) -> DomainResult<PostView> {
        let id = post.id;
        self.annotate(vec![post], viewer)
            .await?
            .pop()
            .ok_or_else(|| DomainError::post_not_found(id))
    }

    /// Attach authors, counts and the viewer's like flag with one batched
    /// query per aggregate.
    async fn annotate(&self, posts: Vec<Post>, viewer: Option<Uuid>) -> DomainResult<Vec<PostView>> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let post_ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
        let mut author_ids: Vec<Uuid> = posts.iter().map(|p| p.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let liked = async {
            match viewer {
                Some(user_id) => self.likes.liked_by_user(user_id, &post_ids).await,
                None => Ok(HashSet::new()),
            }
        };

        let (authors, like_counts, comment_counts, liked) = futures::try_join!(
            self.users.find_by_ids(&author_ids),
            self.likes.count_by_posts(&post_ids),
            self.comments.count_by_posts(&post_ids),
            liked,
        )?;

        let authors: HashMap<Uuid, User> = authors.into_iter().map(|u| (u.id, u)).collect();

        posts
            .into_iter()
            .map(|post| {
                let author = authors.get(&post.author_id).ok_or_else(|| {
                    DomainError::Internal(format!(
                        "author {} of post {} is missing",
                        post.author_id, post.id
                    ))
                })?;

                Ok(PostView {
                    author: Author::from(author),
                    likes_count: like_counts.get(&post.id).copied().unwrap_or(0),
                    comments_count: comment_counts.get(&post.id).copied().unwrap_or(0),
                    is_liked: viewer.map(|_| liked.contains(&post.id)),
                    post,
                })
            })
            .collect()
    }
}
