use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use munadmin_auth::routes::{can_view_page, DASHBOARD_HOME, LOGIN_PAGE};
use munadmin_auth::RoutePolicy;
use munadmin_infra::{AccessError, AccessService};

use crate::app::errors::ApiError;
use crate::context::PrincipalContext;

/// Name of the cookie carrying the session token for browser navigation.
pub const SESSION_COOKIE: &str = "munadmin_session";

#[derive(Clone)]
pub struct AuthState {
    pub access: Arc<AccessService>,
    pub route_policy: RoutePolicy,
}

/// Endpoint-tree guard: no session means 401, before any handler runs.
pub async fn session_guard(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = session_token(req.headers()).ok_or(AccessError::Unauthorized)?;
    let principal = state.access.resolve(token).await?;

    req.extensions_mut().insert(PrincipalContext::new(principal));

    Ok(next.run(req).await)
}

/// Page ingress guard.
///
/// Unauthenticated navigation goes to the login page; an authenticated
/// principal without the page's permission goes back to the dashboard home.
pub async fn page_guard(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let Some(token) = session_token(req.headers()) else {
        return Redirect::to(LOGIN_PAGE).into_response();
    };

    let principal = match state.access.resolve(token).await {
        Ok(p) => p,
        Err(AccessError::Unauthorized) => return Redirect::to(LOGIN_PAGE).into_response(),
        Err(e) => return ApiError::from(e).into_response(),
    };

    let path = req.uri().path().to_string();
    if !can_view_page(&principal.permissions.to_vec(), &path, state.route_policy) {
        tracing::debug!(
            principal_id = %principal.principal_id,
            path = %path,
            "page access denied"
        );
        return Redirect::to(DASHBOARD_HOME).into_response();
    }

    req.extensions_mut().insert(PrincipalContext::new(principal));
    next.run(req).await
}

/// Bearer header first, then the session cookie.
fn session_token(headers: &HeaderMap) -> Option<&str> {
    extract_bearer(headers).or_else(|| extract_cookie(headers, SESSION_COOKIE))
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

fn extract_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.trim())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn bearer_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.insert(header::COOKIE, HeaderValue::from_static("munadmin_session=xyz"));
        assert_eq!(session_token(&headers), Some("abc"));
    }

    #[test]
    fn cookie_is_found_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; munadmin_session=xyz; lang=es"),
        );
        assert_eq!(session_token(&headers), Some("xyz"));
    }

    #[test]
    fn empty_or_malformed_credentials_are_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        headers.insert(header::COOKIE, HeaderValue::from_static("munadmin_session="));
        assert_eq!(session_token(&headers), None);
    }
}
