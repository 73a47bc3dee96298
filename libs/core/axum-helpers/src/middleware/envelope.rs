//! Request-path stamping for error envelopes.

use crate::errors::ErrorResponse;
use axum::{
    extract::{OriginalUri, Request},
    middleware::Next,
    response::Response,
};

/// Fill in `path` on any [`ErrorResponse`] produced further down the stack.
///
/// Handlers and extractors only know their own failure, not where the request
/// was routed from, so `AppError` renders the envelope with an empty path and
/// leaves a copy in the response extensions. This middleware picks that copy
/// up and re-renders it with the original request path. Applying it at
/// several levels is harmless: the first one to see the envelope consumes it.
pub async fn error_envelope(request: Request, next: Next) -> Response {
    let path = request
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.path().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let mut response = next.run(request).await;

    match response.extensions_mut().remove::<ErrorResponse>() {
        Some(envelope) => {
            let mut rendered = envelope.with_path(path).into_http_response();
            rendered.extensions_mut().remove::<ErrorResponse>();
            rendered
        }
        None => response,
    }
}
