use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};

use crate::app::dto::{LoginRequest, LoginResponse, PrincipalView};
use crate::app::errors::ApiError;
use crate::app::extract::ApiJson;
use crate::app::services::AppServices;
use crate::middleware::SESSION_COOKIE;

pub fn router() -> Router {
    Router::new()
        .route("/api/login", post(login))
        .route("/api/logout", post(logout))
}

/// POST /api/login
///
/// Returns the token in the body for API clients and as an HttpOnly cookie
/// for page navigation.
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Response, ApiError> {
    let session = services
        .access
        .authenticate(&body.login_name, &body.password)
        .await?;

    let max_age = services.access.settings().ttl.num_seconds();
    let cookie = format!(
        "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}",
        session.token
    );

    let body = LoginResponse {
        principal: PrincipalView::from(&session.principal),
        token: session.token,
        expires_at: session.expires_at,
    };

    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)], Json(body)).into_response())
}

/// POST /api/logout
///
/// Tokens are stateless; logging out only drops the cookie.
pub async fn logout() -> Response {
    let cookie = format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    (StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)]).into_response()
}
