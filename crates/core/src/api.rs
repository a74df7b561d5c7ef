//! JSON envelope shared by the server and its clients.
//!
//! ```text
//! { "success": true,  "data": { ... } }
//! { "success": false, "error": "DUPLICATE_ENTRY", "message": "..." }
//! ```

use serde::{Deserialize, Serialize};

/// Stable, locale-independent error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The payload failed validation (400).
    ValidationError,
    /// The tax id or email is already registered (409).
    DuplicateEntry,
    /// The backend is unreachable or timed out (503).
    ServiceUnavailable,
    /// Any other failure (500).
    InternalError,
}

impl ErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::DuplicateEntry => "DUPLICATE_ENTRY",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Successful response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSuccess<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiSuccess<T> {
    pub const fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiFailure {
    pub success: bool,
    pub error: ErrorCode,
    pub message: String,
}

impl ApiFailure {
    #[must_use]
    pub const fn new(error: ErrorCode, message: String) -> Self {
        Self {
            success: false,
            error,
            message,
        }
    }
}

/// Either envelope, as seen by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiResponse<T> {
    Success(ApiSuccess<T>),
    Failure(ApiFailure),
}
