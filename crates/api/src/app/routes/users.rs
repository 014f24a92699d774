use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use munadmin_auth::permissions::{MANAGE_USERS, PAGE_USERS};
use munadmin_auth::{NewAccount, PrincipalId};

use crate::app::dto::{AssignPermissionsRequest, CreateUserRequest, SetActiveRequest};
use crate::app::errors::ApiError;
use crate::app::extract::ApiJson;
use crate::app::services::AppServices;
use crate::authz;
use crate::context::PrincipalContext;

/// GET /api/users
pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> Result<Response, ApiError> {
    authz::require_permission(&principal, &PAGE_USERS)?;

    let items = services.access.list_accounts(principal.principal()).await?;
    Ok((StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response())
}

/// POST /api/users
pub async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    ApiJson(body): ApiJson<CreateUserRequest>,
) -> Result<Response, ApiError> {
    authz::require_permission(&principal, &MANAGE_USERS)?;

    let request = NewAccount::new(body.display_name, body.login_name, body.password);
    let created = services
        .access
        .create_account(principal.principal(), request, body.permission_keys)
        .await?;
    Ok((StatusCode::CREATED, Json(created)).into_response())
}

/// PATCH /api/users/:id/active
pub async fn set_active(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<SetActiveRequest>,
) -> Result<Response, ApiError> {
    authz::require_permission(&principal, &MANAGE_USERS)?;

    let id: PrincipalId = id.parse()?;
    let updated = services
        .access
        .set_active(principal.principal(), id, body.active)
        .await?;
    Ok((StatusCode::OK, Json(updated)).into_response())
}

/// PUT /api/users/:id/permissions - replace the whole set in one transaction.
pub async fn assign_permissions(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<AssignPermissionsRequest>,
) -> Result<Response, ApiError> {
    authz::require_permission(&principal, &MANAGE_USERS)?;

    let id: PrincipalId = id.parse()?;
    let keys = services
        .access
        .assign_permissions(principal.principal(), id, body.permission_keys)
        .await?;
    Ok((
        StatusCode::OK,
        Json(serde_json::json!({
            "id": id.to_string(),
            "permission_keys": keys,
        })),
    )
        .into_response())
}
