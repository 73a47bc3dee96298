//! JSON body extractor with enveloped rejections.

use crate::errors::AppError;
use axum::{
    extract::{FromRequest, Json, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

/// Drop-in replacement for [`axum::Json`] on the request side.
///
/// Missing content type, unparsable JSON and body/type mismatches all become
/// a `BAD_REQUEST` envelope instead of axum's plain-text rejection.
///
/// # Example
/// ```ignore
/// use axum_helpers::extractors::ApiJson;
///
/// async fn create(ApiJson(payload): ApiJson<CreateUserRequest>) -> String {
///     format!("{:?}", payload)
/// }
/// ```
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::from(e).into_response())?;

        Ok(ApiJson(data))
    }
}
