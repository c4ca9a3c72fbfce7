//! Domain values to wire DTOs.

use quill_core::domain::{Author, CommentView, Page, Pagination, PostView, User};
use quill_shared::dto::{AuthorResponse, CommentResponse, PostResponse, UserResponse};
use quill_shared::{PaginatedResponse, PaginationMeta};

pub fn user_response(user: User) -> UserResponse {
    UserResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        created_at: user.created_at,
        updated_at: user.updated_at,
    }
}

fn author_response(author: Author) -> AuthorResponse {
    AuthorResponse {
        id: author.id,
        name: author.name,
        email: author.email,
    }
}

pub fn post_response(view: PostView) -> PostResponse {
    let PostView {
        post,
        author,
        likes_count,
        comments_count,
        is_liked,
    } = view;

    PostResponse {
        id: post.id,
        title: post.title,
        content: post.content,
        user: author_response(author),
        likes_count,
        comments_count,
        is_liked,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

pub fn comment_response(view: CommentView) -> CommentResponse {
    CommentResponse {
        id: view.comment.id,
        content: view.comment.content,
        post_id: view.comment.post_id,
        user: author_response(view.author),
        created_at: view.comment.created_at,
    }
}

/// Wrap a service page in the `{data, meta}` envelope.
pub fn paginated<T, U>(
    page: Page<T>,
    pagination: Pagination,
    f: impl FnMut(T) -> U,
) -> PaginatedResponse<U> {
    let meta = PaginationMeta {
        page: pagination.page(),
        page_items: pagination.page_items(),
        total: page.total,
        total_pages: pagination.total_pages(page.total),
    };

    PaginatedResponse::new(page.map(f).items, meta)
}
