//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store selection, seeding, session service
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs
//! - `extract.rs`: JSON body extractor with API-shaped rejections
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use munadmin_infra::AppConfig;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod extract;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: AppConfig) -> anyhow::Result<Router> {
    let services = services::build_services(&config).await?;
    Ok(build_router(Arc::new(services)))
}

/// Router over already-built services.
pub fn build_router(services: Arc<services::AppServices>) -> Router {
    let auth_state = middleware::AuthState {
        access: services.access.clone(),
        route_policy: services.route_policy,
    };

    // API endpoints: require a session, then check permissions per handler.
    let protected = routes::router().layer(axum::middleware::from_fn_with_state(
        auth_state.clone(),
        middleware::session_guard,
    ));

    // Page navigation: redirects instead of error bodies.
    let pages = routes::pages::router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::page_guard,
    ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::auth::router())
        .merge(protected)
        .merge(pages)
        .layer(ServiceBuilder::new().layer(Extension(services)))
}
