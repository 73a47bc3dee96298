use axum::http::Uri;

use super::AppError;

/// Fallback handler for unknown routes.
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route found for {}", uri.path()))
}
