use std::sync::Arc;

use axum::{extract::Extension, Json};

use munadmin_auth::routes::{can_edit, can_export, visible_pages, EDITABLE_RESOURCES};
use munadmin_auth::PermissionKind;

use crate::app::dto::{PrincipalView, SessionView};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

/// GET /api/session - the UI visibility gate.
///
/// Cosmetic only: every control listed here is also enforced by its endpoint.
/// Controls follow the stored catalog, so deleted entries disappear.
pub async fn current_session(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> Result<Json<SessionView>, ApiError> {
    let held = principal.held();
    let catalog = services.access.current_catalog().await?;
    let controls = catalog
        .keys_of_kind(PermissionKind::Action)
        .map(|key| (key.to_string(), principal.principal().can(key)))
        .collect();
    let editable = EDITABLE_RESOURCES
        .iter()
        .map(|resource| (*resource, can_edit(&held, resource)))
        .collect();

    Ok(Json(SessionView {
        principal: PrincipalView::from(principal.principal()),
        visible_pages: visible_pages(&held),
        controls,
        editable,
        can_export: can_export(&held),
    }))
}
