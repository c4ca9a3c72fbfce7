//! Error handling - maps every failure to the `{statusCode, errorCode}` envelope.
//!
//! Causes and validation details are logged, never sent to the client.

use std::time::Duration;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use validator::ValidationErrors;

use quill_core::error::{DomainError, Entity};
use quill_core::ports::AuthError;
use quill_shared::{ErrorCode, ErrorResponse};

/// Application-level error type returned by handlers and extractors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Validation failed: {0:?}")]
    Validation(Vec<String>),

    #[error("Rate limit exceeded, retry after {retry_after:?}")]
    TooManyRequests { retry_after: Duration },
}

impl AppError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            AppError::Domain(err) => match err {
                DomainError::NotFound {
                    entity: Entity::Post,
                    ..
                } => ErrorCode::PostNotFound,
                DomainError::NotFound {
                    entity: Entity::User,
                    ..
                } => ErrorCode::UserNotFound,
                DomainError::CannotRemoveLike { .. } => ErrorCode::CannotRemoveLike,
                DomainError::EmailAlreadyExists => ErrorCode::EmailAlreadyExists,
                DomainError::InvalidCredentials => ErrorCode::InvalidCredentials,
                DomainError::Forbidden { .. } => ErrorCode::Forbidden,
                DomainError::Auth(auth) => auth_error_code(auth),
                DomainError::Repository(_) | DomainError::Internal(_) => ErrorCode::UnknownError,
            },
            AppError::Auth(auth) => auth_error_code(auth),
            AppError::Validation(_) => ErrorCode::ValidationError,
            AppError::TooManyRequests { .. } => ErrorCode::TooManyRequests,
        }
    }
}

fn auth_error_code(err: &AuthError) -> ErrorCode {
    match err {
        AuthError::MissingToken => ErrorCode::MissingToken,
        AuthError::InvalidToken(_) | AuthError::TokenExpired => ErrorCode::InvalidToken,
        AuthError::Hashing(_) | AuthError::Signing(_) => ErrorCode::UnknownError,
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self.error_code() {
            ErrorCode::ValidationError | ErrorCode::CannotRemoveLike => StatusCode::BAD_REQUEST,
            ErrorCode::InvalidCredentials | ErrorCode::MissingToken | ErrorCode::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::PostNotFound | ErrorCode::UserNotFound => StatusCode::NOT_FOUND,
            ErrorCode::EmailAlreadyExists => StatusCode::CONFLICT,
            ErrorCode::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            ErrorCode::UnknownError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let code = self.error_code();

        match self {
            AppError::Validation(messages) => {
                tracing::warn!(error_code = %code, ?messages, "Request rejected");
            }
            _ if status.is_server_error() => {
                tracing::error!(error_code = %code, error = %self, "Request failed");
            }
            _ => tracing::warn!(error_code = %code, error = %self, "Request rejected"),
        }

        let mut response = HttpResponse::build(status);
        if let AppError::TooManyRequests { retry_after } = self {
            response.insert_header(("Retry-After", retry_after.as_secs().max(1).to_string()));
        }
        response.json(ErrorResponse::new(status.as_u16(), code))
    }
}

/// Flatten validator output into `field rule` messages, sorted for stable output.
pub fn validation_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .collect();
    messages.sort();
    messages
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::Validation(vec![]), 400, ErrorCode::ValidationError),
            (
                DomainError::InvalidCredentials.into(),
                401,
                ErrorCode::InvalidCredentials,
            ),
            (AuthError::MissingToken.into(), 401, ErrorCode::MissingToken),
            (AuthError::TokenExpired.into(), 401, ErrorCode::InvalidToken),
            (
                DomainError::Forbidden {
                    acting_user_id: Uuid::nil(),
                    owner_id: Uuid::nil(),
                }
                .into(),
                403,
                ErrorCode::Forbidden,
            ),
            (
                DomainError::post_not_found(Uuid::nil()).into(),
                404,
                ErrorCode::PostNotFound,
            ),
            (
                DomainError::user_not_found(Uuid::nil()).into(),
                404,
                ErrorCode::UserNotFound,
            ),
            (
                DomainError::CannotRemoveLike {
                    post_id: Uuid::nil(),
                    user_id: Uuid::nil(),
                }
                .into(),
                400,
                ErrorCode::CannotRemoveLike,
            ),
            (
                DomainError::EmailAlreadyExists.into(),
                409,
                ErrorCode::EmailAlreadyExists,
            ),
            (
                DomainError::Internal("boom".into()).into(),
                500,
                ErrorCode::UnknownError,
            ),
        ];

        for (err, status, code) in cases {
            assert_eq!(err.status_code().as_u16(), status, "{err}");
            assert_eq!(err.error_code(), code);
        }
    }

    #[test]
    fn test_rate_limited_response_has_retry_after() {
        let err = AppError::TooManyRequests {
            retry_after: Duration::from_secs(7),
        };

        let response = err.error_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers().get("Retry-After").unwrap(), "7");
    }

    #[actix_rt::test]
    async fn test_validation_details_stay_out_of_body() {
        let err = AppError::Validation(vec![
            "Json deserialize error: invalid type: integer `42`".to_string(),
        ]);

        let response = err.error_response();
        let body = actix_web::body::to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"statusCode": 400, "errorCode": "VALIDATION_ERROR"})
        );
    }
}
