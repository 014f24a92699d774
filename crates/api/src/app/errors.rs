use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use munadmin_auth::AuthzError;
use munadmin_core::DomainError;
use munadmin_infra::AccessError;

/// Shown for every 403; the missing key stays in server logs.
pub const FORBIDDEN_MESSAGE: &str = "You do not have permission to perform this action";

/// Error returned by handlers and middleware, rendered as `{error, message}`.
#[derive(Debug)]
pub struct ApiError(pub AccessError);

impl From<AccessError> for ApiError {
    fn from(value: AccessError) -> Self {
        Self(value)
    }
}

impl From<AuthzError> for ApiError {
    fn from(value: AuthzError) -> Self {
        Self(AccessError::from(value))
    }
}

impl From<DomainError> for ApiError {
    fn from(value: DomainError) -> Self {
        Self(AccessError::from(value))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        access_error_to_response(self.0)
    }
}

pub fn access_error_to_response(err: AccessError) -> axum::response::Response {
    match err {
        AccessError::InvalidCredentials => {
            json_error(StatusCode::UNAUTHORIZED, "invalid_credentials", "invalid login name or password")
        }
        AccessError::Unauthorized => json_error(StatusCode::UNAUTHORIZED, "unauthorized", "authentication required"),
        AccessError::Forbidden => json_error(StatusCode::FORBIDDEN, "forbidden", FORBIDDEN_MESSAGE),
        AccessError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        AccessError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        AccessError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        AccessError::Internal(msg) => {
            tracing::error!(error = %msg, "request failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "internal server error")
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
