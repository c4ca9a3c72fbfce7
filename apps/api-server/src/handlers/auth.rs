//! Authentication handlers.

use actix_web::{HttpResponse, web};

use quill_core::services::{AuthSession, Credentials, RegisterUser};
use quill_shared::dto::{AuthResponse, LoginRequest, RegisterRequest};

use super::views::user_response;
use crate::middleware::error::AppResult;
use crate::middleware::validation::ValidatedJson;
use crate::state::AppState;

fn auth_response(state: &AppState, session: AuthSession) -> AuthResponse {
    AuthResponse {
        user: user_response(session.user),
        access_token: session.access_token,
        token_type: "Bearer".to_string(),
        expires_in: state.auth.token_lifetime_seconds(),
    }
}

/// POST /api/v1/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: ValidatedJson<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let session = state
        .auth
        .register(RegisterUser {
            name: req.name,
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(HttpResponse::Created().json(auth_response(&state, session)))
}

/// POST /api/v1/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: ValidatedJson<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let session = state
        .auth
        .login(Credentials {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(HttpResponse::Ok().json(auth_response(&state, session)))
}
