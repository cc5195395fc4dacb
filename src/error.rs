//! Error types for the Bibliotheca server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// No identity present; the caller must log in first. Carries the
    /// originally requested path so the client can come back after login.
    #[error("Authentication required")]
    AuthenticationRequired { next: Option<String> },

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Path of the login endpoint, used to build post-login return targets.
pub const LOGIN_PATH: &str = "/api/v1/auth/login";

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: String,
    /// Login URL (with `next` return target) when authentication is required
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message, login) = match self {
            AppError::AuthenticationRequired { next } => {
                let login = match next {
                    Some(next) => format!("{}?next={}", LOGIN_PATH, next),
                    None => LOGIN_PATH.to_string(),
                };
                (
                    StatusCode::UNAUTHORIZED,
                    "authentication-required",
                    "Authentication required".to_string(),
                    Some(login),
                )
            }
            AppError::Authentication(msg) => {
                (StatusCode::UNAUTHORIZED, "authentication-failed", msg, None)
            }
            AppError::Authorization(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not-found", msg, None),
            AppError::Validation(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "validation", msg, None)
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database",
                    "Database error".to_string(),
                    None,
                )
            }
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad-request", msg, None),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal",
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error,
            message,
            login,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
