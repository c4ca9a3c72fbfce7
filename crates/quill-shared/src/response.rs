//! Response envelopes shared by every endpoint.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Paginated list wrapper: `{data, meta}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, meta: PaginationMeta) -> Self {
        Self { data, meta }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u64,
    pub page_items: u64,
    pub total: u64,
    pub total_pages: u64,
}

/// `{message}` body for actions that return no entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Stable machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationError,
    InvalidCredentials,
    MissingToken,
    InvalidToken,
    Forbidden,
    PostNotFound,
    UserNotFound,
    CannotRemoveLike,
    EmailAlreadyExists,
    TooManyRequests,
    UnknownError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::InvalidCredentials => "INVALID_CREDENTIALS",
            ErrorCode::MissingToken => "MISSING_TOKEN",
            ErrorCode::InvalidToken => "INVALID_TOKEN",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::PostNotFound => "POST_NOT_FOUND",
            ErrorCode::UserNotFound => "USER_NOT_FOUND",
            ErrorCode::CannotRemoveLike => "CANNOT_REMOVE_LIKE",
            ErrorCode::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            ErrorCode::TooManyRequests => "TOO_MANY_REQUESTS",
            ErrorCode::UnknownError => "UNKNOWN_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error body: `{statusCode, errorCode}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub status_code: u16,
    pub error_code: ErrorCode,
}

impl ErrorResponse {
    pub fn new(status_code: u16, error_code: ErrorCode) -> Self {
        Self {
            status_code,
            error_code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_is_camel_case() {
        let meta = PaginationMeta {
            page: 2,
            page_items: 5,
            total: 15,
            total_pages: 3,
        };

        let json = serde_json::to_value(meta).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"page": 2, "pageItems": 5, "total": 15, "totalPages": 3})
        );
    }

    #[test]
    fn test_error_envelope() {
        let not_found = serde_json::to_value(ErrorResponse::new(404, ErrorCode::PostNotFound)).unwrap();
        assert_eq!(
            not_found,
            serde_json::json!({"statusCode": 404, "errorCode": "POST_NOT_FOUND"})
        );

        let validation =
            serde_json::to_value(ErrorResponse::new(400, ErrorCode::ValidationError)).unwrap();
        assert_eq!(
            validation,
            serde_json::json!({"statusCode": 400, "errorCode": "VALIDATION_ERROR"})
        );
    }

    #[test]
    fn test_error_code_matches_serialized_form() {
        let json = serde_json::to_value(ErrorCode::CannotRemoveLike).unwrap();
        assert_eq!(json, ErrorCode::CannotRemoveLike.as_str());
    }
}
