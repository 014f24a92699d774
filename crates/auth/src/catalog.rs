//! Fixed permission vocabulary.
//!
//! The catalog is seeded once at deploy time and never mutated at runtime. It is
//! also the reference used to reject unknown keys in assignment payloads.

use std::collections::HashSet;

use thiserror::Error;

use crate::permissions::{
    Permission, PermissionDef, PermissionKind, EDIT_COMMITTEES, EDIT_COUNTRIES, EDIT_DELEGATES,
    EDIT_EVENTS, EDIT_GRADES, EDIT_SCHOOLS, EDIT_SHEETS, EXPORT_GRADES, FULL_ACCESS, MANAGE_USERS,
    PAGE_CHAIRS, PAGE_COUNTRIES, PAGE_DELEGATES, PAGE_EVALUATION, PAGE_EVENTS, PAGE_GRADING,
    PAGE_SCHOOLS, PAGE_SETUP, PAGE_USERS,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("duplicate permission key '{0}' in catalog")]
    DuplicateKey(String),
}

/// Ordered, duplicate-free list of permission definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    defs: Vec<PermissionDef>,
}

impl Catalog {
    pub fn try_new(defs: Vec<PermissionDef>) -> Result<Self, CatalogError> {
        let mut seen: HashSet<&str> = HashSet::with_capacity(defs.len());
        for def in &defs {
            if !seen.insert(def.key.as_str()) {
                return Err(CatalogError::DuplicateKey(def.key.to_string()));
            }
        }
        Ok(Self { defs })
    }

    /// The built-in catalog.
    ///
    /// # Panics
    ///
    /// If the static table below ever contains a duplicate key.
    pub fn standard() -> Self {
        match Self::try_new(standard_defs()) {
            Ok(catalog) => catalog,
            Err(e) => panic!("built-in permission catalog is invalid: {e}"),
        }
    }

    pub fn get(&self, key: &Permission) -> Option<&PermissionDef> {
        self.defs.iter().find(|d| &d.key == key)
    }

    pub fn contains(&self, key: &Permission) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PermissionDef> {
        self.defs.iter()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Keys of the given kind, in catalog order.
    pub fn keys_of_kind(&self, kind: PermissionKind) -> impl Iterator<Item = &Permission> {
        self.defs.iter().filter(move |d| d.kind == kind).map(|d| &d.key)
    }

    /// Keys from `keys` that are not catalogued (deduplicated, input order).
    pub fn unknown_keys<'a>(&self, keys: impl IntoIterator<Item = &'a Permission>) -> Vec<Permission> {
        let mut unknown: Vec<Permission> = Vec::new();
        for key in keys {
            if !self.contains(key) && !unknown.contains(key) {
                unknown.push(key.clone());
            }
        }
        unknown
    }
}

fn page(key: Permission, display_name: &str, description: &str) -> PermissionDef {
    PermissionDef::new(key, display_name, description, PermissionKind::Page)
}

fn action(key: Permission, display_name: &str, description: &str) -> PermissionDef {
    PermissionDef::new(key, display_name, description, PermissionKind::Action)
}

fn standard_defs() -> Vec<PermissionDef> {
    vec![
        page(PAGE_EVENTS, "Events access", "View the events page"),
        page(PAGE_SETUP, "Setup access", "View the conference setup page"),
        page(PAGE_COUNTRIES, "Countries access", "View the countries page"),
        page(PAGE_DELEGATES, "Delegates access", "View the delegates page"),
        page(PAGE_GRADING, "Grading access", "View the grading page"),
        page(PAGE_EVALUATION, "Evaluation access", "View the evaluation sheets page"),
        page(PAGE_CHAIRS, "Chairs access", "View the committee chairs page"),
        page(PAGE_USERS, "User management", "View the user and permission management page"),
        page(PAGE_SCHOOLS, "Schools access", "View the schools page"),
        action(EDIT_EVENTS, "Edit events", "Create, edit and delete events"),
        action(EDIT_COMMITTEES, "Edit committees", "Create, edit and delete committees"),
        action(EDIT_COUNTRIES, "Edit countries", "Create, edit and delete countries"),
        action(EDIT_DELEGATES, "Edit delegates", "Create, edit and delete delegates"),
        action(EDIT_GRADES, "Edit grades", "Publish and modify grades"),
        action(EDIT_SHEETS, "Edit sheets", "Create, edit and delete evaluation sheets"),
        action(EDIT_SCHOOLS, "Edit schools", "Create, edit and delete schools"),
        action(EXPORT_GRADES, "Export grades", "Export grades to spreadsheet or PDF"),
        action(MANAGE_USERS, "Manage users", "Create accounts and change their permissions"),
        action(FULL_ACCESS, "Full access", "Complete access to every feature"),
    ]
}
