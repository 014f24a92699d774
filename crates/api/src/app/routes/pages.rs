//! Dashboard page descriptors served behind the ingress guard.

use axum::{extract::Extension, http::Uri, routing::get, Json, Router};

use munadmin_auth::routes::visible_pages;

use crate::app::dto::PageView;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/dashboard", get(page))
        .route("/dashboard/*page", get(page))
}

pub async fn page(Extension(principal): Extension<PrincipalContext>, uri: Uri) -> Json<PageView> {
    Json(PageView {
        page: uri.path().to_string(),
        menu: visible_pages(&principal.held()),
    })
}
