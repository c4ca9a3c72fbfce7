//! User profile handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::domain::UserChanges;
use quill_shared::dto::UpdateUserRequest;

use super::views::user_response;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::middleware::validation::ValidatedJson;
use crate::state::AppState;

/// GET /api/v1/users/{id}
pub async fn get_user(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let user = state.users.get_user(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(user_response(user)))
}

/// PUT /api/v1/users/{id} - only the user themselves.
pub async fn update_user(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: ValidatedJson<UpdateUserRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    // Ownership is checked before the user is loaded.
    state.authorization.check_ownership(identity.user_id, id)?;

    let req = body.into_inner();
    let user = state
        .users
        .update_user(
            id,
            UserChanges {
                name: req.name,
                email: req.email,
                password: req.password,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(user_response(user)))
}
