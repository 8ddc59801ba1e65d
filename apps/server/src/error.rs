//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Tally Server                           │
//! │                                                                         │
//! │  Handler                                                                │
//! │  Result<T, ApiError>                                                    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  StoreError::MalformedRecord / Io ─────────► 500 STORAGE_ERROR          │
//! │  CoreError::RecordNotFound ────────────────► 404 NOT_FOUND              │
//! │  CoreError::InsufficientStock ─────────────► 409 INSUFFICIENT_STOCK     │
//! │  CoreError::UnsupportedCurrency ───────────► 400 UNSUPPORTED_CURRENCY   │
//! │  CoreError::Validation / bad form field ───► 400 VALIDATION_ERROR       │
//! │  CoreError::AmountOverflow ────────────────► 400 VALIDATION_ERROR       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The response body is always:
//! ```json
//! { "code": "NOT_FOUND", "message": "Order not found: 7" }
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tally_core::CoreError;
use tally_store::StoreError;

/// API error returned from handlers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Item or order not found (404)
    NotFound,

    /// Requested more than is in stock (409)
    InsufficientStock,

    /// Currency outside EUR/GBP/USD (400)
    UnsupportedCurrency,

    /// Input validation failed (400)
    ValidationError,

    /// Stock or ledger file unreadable or corrupt (500)
    StorageError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::InsufficientStock => StatusCode::CONFLICT,
            ErrorCode::UnsupportedCurrency | ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::StorageError | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::RecordNotFound { .. } => ErrorCode::NotFound,
            CoreError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            CoreError::UnsupportedCurrency(_) => ErrorCode::UnsupportedCurrency,
            CoreError::Validation(_) | CoreError::AmountOverflow { .. } => {
                ErrorCode::ValidationError
            }
        };
        ApiError::new(code, err.to_string())
    }
}

/// Converts storage errors to API errors.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Core(core) => core.into(),
            StoreError::MalformedRecord { .. } | StoreError::Io(_) => {
                // Log the actual error but return a generic message
                tracing::error!(error = %err, "Storage failure");
                ApiError::new(ErrorCode::StorageError, "Stock or order data is unavailable")
            }
            StoreError::InvalidConfig(_) | StoreError::Toml(_) => {
                tracing::error!(error = %err, "Configuration failure");
                ApiError::new(ErrorCode::Internal, "Server is misconfigured")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;
