use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;

use munadmin_auth::permissions::EXPORT_GRADES;
use munadmin_infra::AccessError;

use crate::app::dto;
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::authz;
use crate::context::PrincipalContext;

/// GET /api/grades/export - JSON dump of submitted grade records.
pub async fn export_grades(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> Result<Response, ApiError> {
    authz::require_permission(&principal, &EXPORT_GRADES)?;

    let grades = services
        .records
        .list("grades")
        .await
        .map_err(AccessError::from)?;

    tracing::info!(
        principal_id = %principal.principal_id(),
        rows = grades.len(),
        "grades exported"
    );

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({
            "generated_at": Utc::now(),
            "items": grades.iter().map(dto::record_to_json).collect::<Vec<_>>(),
        })),
    )
        .into_response())
}
