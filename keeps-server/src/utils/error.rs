//! Unified error handling
//!
//! Provides the application-level error type and response envelope:
//! - [`AppError`] - application error enum
//! - [`AppResponse`] - error response envelope
//!
//! # Error code ranges
//!
//! | Prefix | Category | Example |
//! |--------|----------|---------|
//! | E0xxx  | General / validation | E0002 validation failed |
//! | E3xxx  | Authentication | E3001 not logged in |
//! | E5xxx  | Payment | E5001 gateway rejected |
//! | E9xxx  | System | E9002 database error |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::checkout::CheckoutError;
use crate::db::repository::RepoError;
use crate::payment::PaymentError;

/// Error response envelope
///
/// Success responses are plain `Json<T>` bodies; every error goes out in
/// this shape:
///
/// ```json
/// {
///   "code": "E0002",
///   "message": "Validation failed"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse {
    /// Error code
    pub code: String,
    /// Human-readable message
    pub message: String,
}

/// Application error enum
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Authentication errors (401/403) ==========
    #[error("Authentication required")]
    Unauthorized,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Permission denied: {0}")]
    Forbidden(String),

    // ========== Business logic errors (4xx) ==========
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Resource already exists: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    #[error("Payment gateway error: {0}")]
    PaymentGateway(String),

    #[error("Invalid request: {0}")]
    Invalid(String),

    // ========== System errors (5xx) ==========
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // Authentication errors (401)
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "E3001", "Please login first"),
            AppError::TokenExpired => (StatusCode::UNAUTHORIZED, "E3003", "Token expired"),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "E3002", "Invalid token"),

            // Authorization errors (403)
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "E2001", msg.as_str()),

            // Not found (404)
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg.as_str()),

            // Conflict (409)
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "E0004", msg.as_str()),

            // Validation (400)
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg.as_str()),

            // Business rule (422)
            AppError::BusinessRule(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "E0005", msg.as_str())
            }

            // Payment gateway (400) - provider message surfaced verbatim, never retried
            AppError::PaymentGateway(msg) => (StatusCode::BAD_REQUEST, "E5001", msg.as_str()),

            // Invalid request (400)
            AppError::Invalid(msg) => (StatusCode::BAD_REQUEST, "E0006", msg.as_str()),

            // Database errors (500)
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, "E9002", "Database error")
            }

            // Internal errors (500)
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error",
                )
            }
        };

        let body = Json(AppResponse {
            code: code.to_string(),
            message: message.to_string(),
        });

        (status, body).into_response()
    }
}

// ========== Helper Constructors ==========

impl AppError {
    pub fn unauthorized() -> Self {
        Self::Unauthorized
    }

    pub fn token_expired() -> Self {
        Self::TokenExpired
    }

    pub fn invalid_token(_detail: impl Into<String>) -> Self {
        Self::InvalidToken
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn business_rule(msg: impl Into<String>) -> Self {
        Self::BusinessRule(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Unified message to prevent username enumeration during login
    pub fn invalid_credentials() -> Self {
        Self::Invalid("Invalid username or password".to_string())
    }
}

// ========== Conversions from lower layers ==========

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl From<CheckoutError> for AppError {
    fn from(e: CheckoutError) -> Self {
        match e {
            CheckoutError::EmptyCart => {
                AppError::BusinessRule("Cart is empty, add items before ordering".to_string())
            }
            CheckoutError::CodeExhausted => {
                AppError::Internal("Failed to allocate a unique order code".to_string())
            }
            CheckoutError::Repo(repo) => repo.into(),
        }
    }
}

impl From<PaymentError> for AppError {
    fn from(e: PaymentError) -> Self {
        AppError::PaymentGateway(e.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::Validation(e.to_string())
    }
}

