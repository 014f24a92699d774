use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use munadmin_auth::{Permission, Principal};
use munadmin_infra::records::Record;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub login_name: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateUserRequest {
    pub display_name: String,
    pub login_name: String,
    pub password: String,
    #[serde(default)]
    pub permission_keys: Vec<Permission>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetActiveRequest {
    pub active: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssignPermissionsRequest {
    pub permission_keys: Vec<Permission>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateRecordRequest {
    pub data: serde_json::Value,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct PrincipalView {
    pub id: String,
    pub display_name: String,
    pub login_name: String,
    pub permissions: Vec<Permission>,
}

impl From<&Principal> for PrincipalView {
    fn from(p: &Principal) -> Self {
        Self {
            id: p.principal_id.to_string(),
            display_name: p.display_name.clone(),
            login_name: p.login_name.clone(),
            permissions: p.permissions.to_vec(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub principal: PrincipalView,
}

/// What the client needs to decide which menus and buttons to show.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub principal: PrincipalView,
    pub visible_pages: Vec<&'static str>,
    pub controls: BTreeMap<String, bool>,
    /// Record type to whether its create/edit buttons apply.
    pub editable: BTreeMap<&'static str, bool>,
    pub can_export: bool,
}

#[derive(Debug, Serialize)]
pub struct PageView {
    pub page: String,
    pub menu: Vec<&'static str>,
}

pub fn record_to_json(r: &Record) -> serde_json::Value {
    serde_json::json!({
        "id": r.id.to_string(),
        "resource": r.resource,
        "data": r.data,
        "created_by": r.created_by.to_string(),
        "created_at": r.created_at,
    })
}
