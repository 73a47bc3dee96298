//! Type-safe error codes for API responses.
//!
//! Each error code carries:
//! - String representation for client consumption (e.g., "VALIDATION_FAILED")
//! - Integer code for logging and monitoring (e.g., 1001)
//! - Default human-readable message
//!
//! # Example
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::ValidationFailed;
//! assert_eq!(code.as_str(), "VALIDATION_FAILED");
//! assert_eq!(code.code(), 1001);
//! assert_eq!(code.default_message(), "Validation failed");
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error codes surfaced in the `errorCode` field of every error envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    /// One or more request fields violated their constraints
    ValidationFailed,

    /// Request was rejected for any other reason (malformed body, bad id, bad query)
    BadRequest,

    /// Requested resource or route was not found
    NotFound,

    /// Another user already owns the supplied email
    DuplicateEmail,

    // Server errors (5000-5999)
    /// An unexpected internal failure, details are only logged
    InternalError,
}

impl ErrorCode {
    /// SCREAMING_SNAKE_CASE identifier that clients match on.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::BadRequest => "BAD_REQUEST",
            Self::NotFound => "NOT_FOUND",
            Self::DuplicateEmail => "DUPLICATE_EMAIL",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Integer code for structured logs.
    ///
    /// - 1000-1999: Client errors
    /// - 5000-5999: Server errors
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationFailed => 1001,
            Self::BadRequest => 1002,
            Self::NotFound => 1004,
            Self::DuplicateEmail => 1008,
            Self::InternalError => 5001,
        }
    }

    /// Default user-facing message, handlers may override it.
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationFailed => "Validation failed",
            Self::BadRequest => "Bad request",
            Self::NotFound => "Resource not found",
            Self::DuplicateEmail => "Email already exists",
            Self::InternalError => "An internal server error occurred",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
