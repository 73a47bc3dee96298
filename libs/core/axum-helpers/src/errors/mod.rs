pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use utoipa::ToSchema;

/// Field name to human-readable reason, keyed by the field's wire name.
pub type FieldViolations = BTreeMap<String, String>;

/// Error envelope returned for every failed request.
///
/// # JSON Example
///
/// ```json
/// {
///   "timestamp": "2025-01-01T12:00:00Z",
///   "path": "/api/v1/users",
///   "status": 400,
///   "errorCode": "VALIDATION_FAILED",
///   "message": "Validation failed",
///   "validationErrors": { "email": "Email must be valid" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// When the failure was produced
    pub timestamp: DateTime<Utc>,
    /// Path of the request that failed
    pub path: String,
    /// Numeric HTTP status, duplicated from the status line
    pub status: u16,
    /// Machine-readable error code
    pub error_code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Violated fields, null unless the code is VALIDATION_FAILED
    pub validation_errors: Option<FieldViolations>,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, error_code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            path: String::new(),
            status: status.as_u16(),
            error_code,
            message: message.into(),
            validation_errors: None,
        }
    }

    pub fn with_validation_errors(mut self, violations: FieldViolations) -> Self {
        self.validation_errors = Some(violations);
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Render the envelope as a response.
    ///
    /// The envelope is also stored as a response extension so that
    /// [`crate::middleware::error_envelope`] can stamp the request path on it.
    pub fn into_http_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, Json(self.clone())).into_response();
        response.extensions_mut().insert(self);
        response
    }
}

/// Application error type that can be converted to HTTP responses.
///
/// Extractor rejections are all reported as `BAD_REQUEST`, whatever status
/// axum would have picked for them.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Validation failed: {0:?}")]
    ValidationFailed(FieldViolations),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Duplicate email: {0}")]
    DuplicateEmail(String),

    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Path extraction error: {0}")]
    PathExtractorRejection(#[from] PathRejection),

    #[error("Query extraction error: {0}")]
    QueryExtractorRejection(#[from] QueryRejection),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
}

impl AppError {
    /// Build the envelope for this error, without the request path.
    pub fn to_error_response(&self) -> ErrorResponse {
        match self {
            AppError::ValidationFailed(violations) => {
                tracing::info!(
                    error_code = ErrorCode::ValidationFailed.code(),
                    fields = ?violations.keys().collect::<Vec<_>>(),
                    "Validation failed"
                );
                ErrorResponse::new(
                    StatusCode::BAD_REQUEST,
                    ErrorCode::ValidationFailed,
                    ErrorCode::ValidationFailed.default_message(),
                )
                .with_validation_errors(violations.clone())
            }
            AppError::BadRequest(msg) => {
                tracing::info!(error_code = ErrorCode::BadRequest.code(), "Bad request: {}", msg);
                ErrorResponse::new(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, msg.clone())
            }
            AppError::NotFound(msg) => {
                tracing::info!(error_code = ErrorCode::NotFound.code(), "Not found: {}", msg);
                ErrorResponse::new(StatusCode::NOT_FOUND, ErrorCode::NotFound, msg.clone())
            }
            AppError::DuplicateEmail(msg) => {
                tracing::info!(
                    error_code = ErrorCode::DuplicateEmail.code(),
                    "Duplicate email: {}",
                    msg
                );
                ErrorResponse::new(StatusCode::CONFLICT, ErrorCode::DuplicateEmail, msg.clone())
            }
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(
                    error_code = ErrorCode::BadRequest.code(),
                    "JSON extraction error: {:?}",
                    e
                );
                ErrorResponse::new(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, e.body_text())
            }
            AppError::PathExtractorRejection(e) => {
                tracing::warn!(
                    error_code = ErrorCode::BadRequest.code(),
                    "Path extraction error: {:?}",
                    e
                );
                ErrorResponse::new(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, e.body_text())
            }
            AppError::QueryExtractorRejection(e) => {
                tracing::warn!(
                    error_code = ErrorCode::BadRequest.code(),
                    "Query extraction error: {:?}",
                    e
                );
                ErrorResponse::new(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, e.body_text())
            }
            AppError::InternalServerError(msg) => {
                // The detail is logged, never returned
                tracing::error!(
                    error_code = ErrorCode::InternalError.code(),
                    "Internal server error: {}",
                    msg
                );
                ErrorResponse::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::InternalError,
                    ErrorCode::InternalError.default_message(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_error_response().into_http_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn envelope(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_failed_carries_violations() {
        let mut violations = FieldViolations::new();
        violations.insert("email".to_string(), "Email must be valid".to_string());

        let response = AppError::ValidationFailed(violations).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.extensions().get::<ErrorResponse>().is_some());

        let json = envelope(response).await;
        assert_eq!(json["status"], 400);
        assert_eq!(json["errorCode"], "VALIDATION_FAILED");
        assert_eq!(json["message"], "Validation failed");
        assert_eq!(json["validationErrors"]["email"], "Email must be valid");
        assert!(json["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_not_found_has_null_violations() {
        let response = AppError::NotFound("User not found with id : 7".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let json = envelope(response).await;
        assert_eq!(json["errorCode"], "NOT_FOUND");
        assert_eq!(json["message"], "User not found with id : 7");
        assert!(json["validationErrors"].is_null());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let response = AppError::DuplicateEmail("a@x.com".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(envelope(response).await["errorCode"], "DUPLICATE_EMAIL");
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let response =
            AppError::InternalServerError("connection refused on 10.0.0.3".to_string())
                .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = envelope(response).await;
        assert_eq!(json["errorCode"], "INTERNAL_ERROR");
        assert!(!json["message"].as_str().unwrap().contains("10.0.0.3"));
    }

    #[test]
    fn test_error_response_round_trips_camel_case() {
        let response = ErrorResponse::new(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, "bad")
            .with_path("/api/v1/users");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["path"], "/api/v1/users");
        assert_eq!(json["errorCode"], "BAD_REQUEST");

        let back: ErrorResponse = serde_json::from_value(json).unwrap();
        assert_eq!(back, response);
    }
}
