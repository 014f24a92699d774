use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;

use munadmin_infra::AccessError;

use crate::app::errors::ApiError;

/// `Json` body extractor whose rejections use the API error shape.
///
/// Malformed JSON, unknown fields and a missing content type all become a 400
/// `validation_error` instead of axum's plain-text responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(rejection_to_error(rejection)),
        }
    }
}

fn rejection_to_error(rejection: JsonRejection) -> ApiError {
    tracing::debug!(status = %rejection.status(), "request body rejected");
    ApiError(AccessError::Validation(rejection.body_text()))
}
