//! Application error types for robust error handling.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::db::StoreError;

const OPAQUE_MESSAGE: &str = "Something went wrong. Please try again later.";
const UNAVAILABLE_MESSAGE: &str = "Service temporarily unavailable. Please try again later.";

/// Session token verification failures.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
}

/// Application-level errors.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("User not found")]
    UserNotFound,

    #[error("Password is not correct.")]
    InvalidCredentials,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Missing or invalid Authorization header")]
    MissingToken,

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate(field) => AppError::Conflict(format!("{} already registered", field)),
            StoreError::NotFound => AppError::NotFound("record not found".to_string()),
            StoreError::InvalidPattern(msg) => AppError::Validation(format!("invalid search pattern: {}", msg)),
            StoreError::Unavailable(msg) => AppError::StoreUnavailable(msg),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidCredentials => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::UserNotFound | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MissingToken | AppError::Token(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Config(_) | AppError::Hashing(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::StoreUnavailable(_) => {
                tracing::error!(error = %self, "store failure");
                UNAVAILABLE_MESSAGE.to_string()
            }
            AppError::Config(_) | AppError::Hashing(_) | AppError::Internal(_) => {
                tracing::error!(error = %self, "request failed");
                OPAQUE_MESSAGE.to_string()
            }
            AppError::Validation(msg)
            | AppError::Conflict(msg)
            | AppError::NotFound(msg)
            | AppError::Forbidden(msg) => msg.clone(),
            AppError::Token(e) => e.to_string(),
            AppError::UserNotFound | AppError::InvalidCredentials | AppError::MissingToken => {
                self.to_string()
            }
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_errors_stay_distinct() {
        assert_eq!(AppError::UserNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::InvalidCredentials.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn store_errors_map_to_taxonomy() {
        let conflict: AppError = StoreError::Duplicate("email".to_string()).into();
        assert!(matches!(conflict, AppError::Conflict(_)));
        let down: AppError = StoreError::Unavailable("pool timed out".to_string()).into();
        assert_eq!(down.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn infrastructure_detail_is_not_leaked() {
        let res = AppError::StoreUnavailable("connection refused at 10.0.0.3".to_string())
            .into_response();
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(!text.contains("10.0.0.3"));
    }
}
