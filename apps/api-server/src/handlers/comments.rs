//! Comment handlers, nested under a post.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::domain::Pagination;
use quill_shared::dto::{CreateCommentRequest, PaginationQuery};

use super::views::{comment_response, paginated};
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::middleware::validation::ValidatedJson;
use crate::state::AppState;

/// GET /api/v1/posts/{id}/comments
pub async fn list_comments(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<PaginationQuery>,
) -> AppResult<HttpResponse> {
    let pagination = Pagination::new(query.page, query.page_items);

    let page = state
        .comments
        .list_comments(path.into_inner(), pagination)
        .await?;

    Ok(HttpResponse::Ok().json(paginated(page, pagination, comment_response)))
}

/// POST /api/v1/posts/{id}/comments
pub async fn create_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: ValidatedJson<CreateCommentRequest>,
) -> AppResult<HttpResponse> {
    let view = state
        .comments
        .create_comment(identity.user_id, path.into_inner(), body.into_inner().content)
        .await?;

    Ok(HttpResponse::Created().json(comment_response(view)))
}
