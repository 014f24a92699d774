//! Conference records behind per-resource edit permissions.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;

use munadmin_auth::routes::edit_permission_for;
use munadmin_core::RecordId;
use munadmin_infra::records::Record;
use munadmin_infra::AccessError;

use crate::app::dto::{self, CreateRecordRequest};
use crate::app::errors::ApiError;
use crate::app::extract::ApiJson;
use crate::app::routes::common::CmdAuth;
use crate::app::services::AppServices;
use crate::authz;
use crate::context::PrincipalContext;

/// POST /api/records/:resource - requires `edit_<resource>`.
pub async fn create_record(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(resource): Path<String>,
    ApiJson(body): ApiJson<CreateRecordRequest>,
) -> Result<Response, ApiError> {
    let required = edit_permission_for(&resource).ok_or(AccessError::NotFound)?;

    let record = Record {
        id: RecordId::new(),
        resource,
        data: body.data,
        created_by: principal.principal_id(),
        created_at: Utc::now(),
    };
    let cmd_auth = CmdAuth {
        inner: record,
        required: vec![required],
    };
    authz::authorize_command(&principal, &cmd_auth)?;

    let json = dto::record_to_json(&cmd_auth.inner);
    services
        .records
        .append(cmd_auth.inner)
        .await
        .map_err(AccessError::from)?;

    Ok((StatusCode::CREATED, Json(json)).into_response())
}

/// GET /api/records/:resource
pub async fn list_records(
    Extension(services): Extension<Arc<AppServices>>,
    Path(resource): Path<String>,
) -> Result<Response, ApiError> {
    if edit_permission_for(&resource).is_none() {
        return Err(AccessError::NotFound.into());
    }

    let items = services
        .records
        .list(&resource)
        .await
        .map_err(AccessError::from)?
        .iter()
        .map(dto::record_to_json)
        .collect::<Vec<_>>();
    Ok((StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response())
}
