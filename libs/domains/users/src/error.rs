use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, FieldViolations};
use thiserror::Error;

use crate::repository::StorageError;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found with id : {0}")]
    NotFound(i64),

    #[error("User with email: {0} already exists")]
    DuplicateEmail(String),

    #[error("Validation failed: {0:?}")]
    Validation(FieldViolations),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl UserError {
    /// Translate a storage failure raised while writing a record with `email`.
    ///
    /// A unique violation on a write can only come from the email column.
    pub fn from_write(err: StorageError, email: &str) -> Self {
        match err {
            StorageError::UniqueViolation(_) => UserError::DuplicateEmail(email.to_string()),
            other => other.into(),
        }
    }
}

impl From<StorageError> for UserError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UniqueViolation(msg) => {
                UserError::Internal(format!("Unexpected unique violation: {}", msg))
            }
            StorageError::NotFound(id) => UserError::NotFound(id),
            StorageError::Backend(msg) => UserError::Internal(msg),
        }
    }
}

/// Convert UserError to AppError for standardized error responses
impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(id) => {
                AppError::NotFound(format!("User not found with id : {}", id))
            }
            UserError::DuplicateEmail(email) => {
                AppError::DuplicateEmail(format!("User with email: {} already exists", email))
            }
            UserError::Validation(violations) => AppError::ValidationFailed(violations),
            UserError::BadRequest(msg) => AppError::BadRequest(msg),
            UserError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
