//! Post handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::domain::{NewPost, Pagination, PostChanges};
use quill_shared::MessageResponse;
use quill_shared::dto::{CreatePostRequest, PaginationQuery, UpdatePostRequest};

use super::views::{paginated, post_response};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::middleware::validation::ValidatedJson;
use crate::state::AppState;

/// GET /api/v1/posts
pub async fn list_posts(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    query: web::Query<PaginationQuery>,
) -> AppResult<HttpResponse> {
    let pagination = Pagination::new(query.page, query.page_items);

    let page = state.posts.list_posts(pagination, viewer.user_id()).await?;

    Ok(HttpResponse::Ok().json(paginated(page, pagination, post_response)))
}

/// GET /api/v1/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let view = state
        .posts
        .get_post(path.into_inner(), viewer.user_id())
        .await?;

    Ok(HttpResponse::Ok().json(post_response(view)))
}

/// POST /api/v1/posts
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: ValidatedJson<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let view = state
        .posts
        .create_post(
            identity.user_id,
            NewPost {
                title: req.title,
                content: req.content,
            },
        )
        .await?;

    Ok(HttpResponse::Created().json(post_response(view)))
}

/// PUT /api/v1/posts/{id} - author only.
pub async fn update_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: ValidatedJson<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();

    let post = state.posts.find_post(id).await?;
    state
        .authorization
        .check_ownership(identity.user_id, post.author_id)?;

    let view = state
        .posts
        .update_post(
            id,
            PostChanges {
                title: req.title,
                content: req.content,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(post_response(view)))
}

/// PATCH /api/v1/posts/{id}/like
pub async fn like_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .posts
        .like_post(path.into_inner(), identity.user_id)
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Like added successfully")))
}

/// PATCH /api/v1/posts/{id}/unlike
pub async fn unlike_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .posts
        .unlike_post(path.into_inner(), identity.user_id)
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Like removed successfully")))
}
