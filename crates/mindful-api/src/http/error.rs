//! Application error type mapping to HTTP status codes.
//!
//! Error bodies are `{"detail": <message>, "code": <MACHINE_CODE>}`. Store
//! failures answer with a fixed detail; the driver error only reaches the log.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use mindful_types::error::{ForumError, RepositoryError};

/// Detail sent to clients for every storage failure.
pub const STORE_ERROR_DETAIL: &str = "The data store is unavailable, please try again later";

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Forum validation, lookup, or storage failure.
    Forum(ForumError),
    /// Storage failure outside the forum.
    Store(RepositoryError),
    /// Resource not found.
    NotFound(String),
}

impl From<ForumError> for AppError {
    fn from(e: ForumError) -> Self {
        AppError::Forum(e)
    }
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        AppError::Store(e)
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Forum(ForumError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Forum(ForumError::PostNotFound) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", "Post not found".to_string())
            }
            AppError::Forum(ForumError::Storage(_)) | AppError::Store(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORE_ERROR",
                STORE_ERROR_DETAIL.to_string(),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, detail) = self.parts();

        if let AppError::Forum(ForumError::Storage(e)) | AppError::Store(e) = &self {
            tracing::error!(code, status = status.as_u16(), error = %e, "Request failed");
        }

        (status, Json(json!({ "detail": detail, "code": code }))).into_response()
    }
}
