use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

pub mod auth;
pub mod common;
pub mod export;
pub mod pages;
pub mod permissions;
pub mod records;
pub mod session;
pub mod system;
pub mod users;

/// Router for all session-protected API endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/api/session", get(session::current_session))
        .route("/api/permissions", get(permissions::list_permissions))
        .route("/api/permissions/:key", delete(permissions::remove_permission))
        .route("/api/users", get(users::list_users).post(users::create_user))
        .route("/api/users/:id/active", patch(users::set_active))
        .route("/api/users/:id/permissions", put(users::assign_permissions))
        .route(
            "/api/records/:resource",
            post(records::create_record).get(records::list_records),
        )
        .route("/api/grades/export", get(export::export_grades))
}
