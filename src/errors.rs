//! Centralized error handling.
//!
//! Provides a unified error type for the entire application,
//! with automatic HTTP response conversion into `{status, reason}` bodies.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::types::StatusResponse;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Client-caused request problems
    #[error("{0}")]
    Validation(String),

    // Semantic conflicts
    #[error("Email Validation Failed. You are not allowed to create an account with us.")]
    Blacklisted,

    #[error("User with Email '{0}' is already registered.")]
    AlreadyRegistered(String),

    // Verification
    #[error("Email confirmation link is invalid or has expired.")]
    TokenInvalidOrExpired,

    #[error("User with Email '{0}' is not found.")]
    NotFound(String),

    // External service errors
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    /// Get the status string reported to the client
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION-ERROR",
            AppError::Blacklisted => "BLACKLISTED",
            AppError::AlreadyRegistered(_) => "ALREADY-REGISTERED",
            AppError::TokenInvalidOrExpired => "VERIFICATION-EXPIRED",
            AppError::NotFound(_) => "INVALID-USER",
            AppError::Database(_) | AppError::Internal(_) => "INTERNAL-SERVER-ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Blacklisted => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::AlreadyRegistered(_) => StatusCode::CONFLICT,
            AppError::TokenInvalidOrExpired | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    fn user_message(&self) -> String {
        match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
            _ => self.to_string(),
        }
    }

    /// Whether the error is a server-side failure rather than a client outcome
    pub fn is_internal(&self) -> bool {
        matches!(self, AppError::Database(_) | AppError::Internal(_))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = StatusResponse::new(self.kind(), self.user_message());

        (status, Json(body)).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Convenience constructors
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
