use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use munadmin_auth::permissions::MANAGE_USERS;
use munadmin_auth::Permission;

use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::authz;
use crate::context::PrincipalContext;

/// GET /api/permissions - the stored catalog.
pub async fn list_permissions(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Response, ApiError> {
    let items = services.access.list_permissions().await?;
    Ok((StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response())
}

/// DELETE /api/permissions/:key - only while nobody holds it.
pub async fn remove_permission(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(key): Path<String>,
) -> Result<StatusCode, ApiError> {
    authz::require_permission(&principal, &MANAGE_USERS)?;

    services
        .access
        .remove_permission(principal.principal(), &Permission::from(key))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
