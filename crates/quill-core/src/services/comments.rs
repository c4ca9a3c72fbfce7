//! Comments on posts.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Author, Comment, CommentView, Page, Pagination};
use crate::error::{DomainError, DomainResult};
use crate::ports::{CommentRepository, UserRepository};

use super::PostsService;

pub struct CommentsService {
    comments: Arc<dyn CommentRepository>,
    users: Arc<dyn UserRepository>,
    posts: Arc<PostsService>,
}

impl CommentsService {
    pub fn new(
        comments: Arc<dyn CommentRepository>,
        users: Arc<dyn UserRepository>,
        posts: Arc<PostsService>,
    ) -> Self {
        Self {
            comments,
            users,
            posts,
        }
    }

    pub async fn create_comment(
        &self,
        user_id: Uuid,
        post_id: Uuid,
        content: String,
    ) -> DomainResult<CommentView> {
        self.posts.find_post(post_id).await?;

        let author = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(user_id))?;

        let comment = self
            .comments
            .insert(Comment::new(post_id, user_id, content))
            .await?;

        tracing::info!(comment_id = %comment.id, post_id = %post_id, "Comment created");

        Ok(CommentView {
            comment,
            author: Author::from(&author),
        })
    }

    /// Comments of a post, newest first.
    pub async fn list_comments(
        &self,
        post_id: Uuid,
        pagination: Pagination,
    ) -> DomainResult<Page<CommentView>> {
        self.posts.find_post(post_id).await?;

        let page = self.comments.find_page_by_post(post_id, pagination).await?;
        if page.items.is_empty() {
            return Ok(Page::new(Vec::new(), page.total));
        }

        let mut author_ids: Vec<Uuid> = page.items.iter().map(|c| c.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let authors: HashMap<Uuid, Author> = self
            .users
            .find_by_ids(&author_ids)
            .await?
            .iter()
            .map(|u| (u.id, Author::from(u)))
            .collect();

        let total = page.total;
        let items = page
            .items
            .into_iter()
            .map(|comment| {
                let author = authors.get(&comment.author_id).cloned().ok_or_else(|| {
                    DomainError::Internal(format!(
                        "author {} of comment {} is missing",
                        comment.author_id, comment.id
                    ))
                })?;
                Ok(CommentView { comment, author })
            })
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(Page::new(items, total))
    }
}
