use std::borrow::Cow;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Permission identifier.
///
/// Permissions are opaque, stable keys (e.g. `"page_events"`,
/// `"edit_delegates"`). The special key [`FULL_ACCESS`] satisfies every check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_full_access(&self) -> bool {
        self.as_str() == FULL_ACCESS.as_str()
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Permission {
    fn from(value: &'static str) -> Self {
        Self::from_static(value)
    }
}

impl From<String> for Permission {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

/// Superuser escape hatch: holding it passes every authorization check.
pub const FULL_ACCESS: Permission = Permission::from_static("full_access");

pub const PAGE_EVENTS: Permission = Permission::from_static("page_events");
pub const PAGE_SETUP: Permission = Permission::from_static("page_setup");
pub const PAGE_COUNTRIES: Permission = Permission::from_static("page_countries");
pub const PAGE_DELEGATES: Permission = Permission::from_static("page_delegates");
pub const PAGE_GRADING: Permission = Permission::from_static("page_grading");
pub const PAGE_EVALUATION: Permission = Permission::from_static("page_evaluation");
pub const PAGE_CHAIRS: Permission = Permission::from_static("page_chairs");
pub const PAGE_USERS: Permission = Permission::from_static("page_users");
pub const PAGE_SCHOOLS: Permission = Permission::from_static("page_schools");

pub const EDIT_EVENTS: Permission = Permission::from_static("edit_events");
pub const EDIT_COMMITTEES: Permission = Permission::from_static("edit_committees");
pub const EDIT_COUNTRIES: Permission = Permission::from_static("edit_countries");
pub const EDIT_DELEGATES: Permission = Permission::from_static("edit_delegates");
pub const EDIT_GRADES: Permission = Permission::from_static("edit_grades");
pub const EDIT_SHEETS: Permission = Permission::from_static("edit_sheets");
pub const EDIT_SCHOOLS: Permission = Permission::from_static("edit_schools");
pub const EXPORT_GRADES: Permission = Permission::from_static("export_grades");
pub const MANAGE_USERS: Permission = Permission::from_static("manage_users");

/// Whether a permission gates navigation to a page or an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PermissionKind {
    Page,
    Action,
}

impl PermissionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionKind::Page => "PAGE",
            PermissionKind::Action => "ACTION",
        }
    }
}

impl core::str::FromStr for PermissionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PAGE" => Ok(PermissionKind::Page),
            "ACTION" => Ok(PermissionKind::Action),
            other => Err(format!("unknown permission kind '{other}'")),
        }
    }
}

/// Catalog entry. `display_name` and `description` are presentation-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionDef {
    pub key: Permission,
    pub display_name: String,
    pub description: String,
    pub kind: PermissionKind,
}

impl PermissionDef {
    pub fn new(
        key: impl Into<Permission>,
        display_name: impl Into<String>,
        description: impl Into<String>,
        kind: PermissionKind,
    ) -> Self {
        Self {
            key: key.into(),
            display_name: display_name.into(),
            description: description.into(),
            kind,
        }
    }
}

/// The flat set of permission keys held by a principal.
///
/// Ordered so that snapshots embedded in tokens and API payloads are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<Permission>);

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, permission: &Permission) -> bool {
        self.0.contains(permission)
    }

    pub fn insert(&mut self, permission: Permission) -> bool {
        self.0.insert(permission)
    }

    pub fn has_full_access(&self) -> bool {
        self.0.contains(&FULL_ACCESS)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.0.iter()
    }

    pub fn to_vec(&self) -> Vec<Permission> {
        self.0.iter().cloned().collect()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for PermissionSet {
    type Item = Permission;
    type IntoIter = std::collections::btree_set::IntoIter<Permission>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a PermissionSet {
    type Item = &'a Permission;
    type IntoIter = std::collections::btree_set::Iter<'a, Permission>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_and_owned_keys_compare_equal() {
        assert_eq!(Permission::new(String::from("full_access")), FULL_ACCESS);
        assert!(Permission::from("full_access").is_full_access());
    }

    #[test]
    fn kind_serializes_uppercase() {
        assert_eq!(serde_json::to_value(PermissionKind::Page).unwrap(), "PAGE");
        let kind: PermissionKind = serde_json::from_value(serde_json::json!("ACTION")).unwrap();
        assert_eq!(kind, PermissionKind::Action);
        assert!("action".parse::<PermissionKind>().is_err());
    }

    #[test]
    fn permission_set_deduplicates_and_orders() {
        let set: PermissionSet = ["page_events", "edit_events", "page_events"]
            .into_iter()
            .map(Permission::from)
            .collect();
        assert_eq!(set.len(), 2);
        let keys: Vec<&str> = set.iter().map(Permission::as_str).collect();
        assert_eq!(keys, vec!["edit_events", "page_events"]);
    }

    #[test]
    fn permission_set_is_a_json_array() {
        let set: PermissionSet = [PAGE_DELEGATES].into_iter().collect();
        assert_eq!(serde_json::to_value(&set).unwrap(), serde_json::json!(["page_delegates"]));
    }
}
