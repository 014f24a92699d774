//! Page route table and UI gating helpers.
//!
//! `PAGE_ROUTES` is the single source of truth for which dashboard section needs
//! which permission. The ingress guard and the menu builder both read it.

use serde::{Deserialize, Serialize};

use crate::authorize::authorized;
use crate::permissions::{
    Permission, EDIT_COMMITTEES, EDIT_COUNTRIES, EDIT_DELEGATES, EDIT_EVENTS, EDIT_GRADES,
    EDIT_SCHOOLS, EDIT_SHEETS, EXPORT_GRADES, PAGE_CHAIRS, PAGE_COUNTRIES, PAGE_DELEGATES,
    PAGE_EVALUATION, PAGE_EVENTS, PAGE_GRADING, PAGE_SCHOOLS, PAGE_SETUP, PAGE_USERS,
};

/// Landing page every authenticated principal may open.
pub const DASHBOARD_HOME: &str = "/dashboard";

/// Where unauthenticated page requests are sent.
pub const LOGIN_PAGE: &str = "/login";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRoute {
    pub path: &'static str,
    pub required: Permission,
}

pub const PAGE_ROUTES: &[PageRoute] = &[
    PageRoute { path: "/dashboard/events", required: PAGE_EVENTS },
    PageRoute { path: "/dashboard/setup", required: PAGE_SETUP },
    PageRoute { path: "/dashboard/countries", required: PAGE_COUNTRIES },
    PageRoute { path: "/dashboard/delegates", required: PAGE_DELEGATES },
    PageRoute { path: "/dashboard/grading", required: PAGE_GRADING },
    PageRoute { path: "/dashboard/evaluation", required: PAGE_EVALUATION },
    PageRoute { path: "/dashboard/chairs", required: PAGE_CHAIRS },
    PageRoute { path: "/dashboard/users", required: PAGE_USERS },
    PageRoute { path: "/dashboard/schools", required: PAGE_SCHOOLS },
];

/// How pages missing from [`PAGE_ROUTES`] are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutePolicy {
    /// Any authenticated principal may open an unlisted page.
    #[default]
    AllowUnlisted,
    /// Unlisted pages are closed unless the principal holds `full_access`.
    DenyUnlisted,
}

fn normalize(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

fn covers(route: &str, path: &str) -> bool {
    match path.strip_prefix(route) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Listed route governing `path`: the route itself or any sub-path of it.
pub fn route_for(path: &str) -> Option<&'static PageRoute> {
    let path = normalize(path);
    PAGE_ROUTES.iter().find(|r| covers(r.path, path))
}

/// Permission needed to open `path`, if the route table lists it.
pub fn required_for(path: &str) -> Option<&'static Permission> {
    route_for(path).map(|r| &r.required)
}

/// Whether a principal holding `held` may open `path`.
pub fn can_view_page(held: &[Permission], path: &str, policy: RoutePolicy) -> bool {
    if normalize(path) == DASHBOARD_HOME {
        return true;
    }
    match required_for(path) {
        Some(required) => authorized(held, required),
        None => match policy {
            RoutePolicy::AllowUnlisted => true,
            RoutePolicy::DenyUnlisted => held.iter().any(Permission::is_full_access),
        },
    }
}

/// Listed pages the principal can open, in table order (for menus).
pub fn visible_pages(held: &[Permission]) -> Vec<&'static str> {
    PAGE_ROUTES
        .iter()
        .filter(|r| authorized(held, &r.required))
        .map(|r| r.path)
        .collect()
}

/// Record types with an edit permission, in menu order.
pub const EDITABLE_RESOURCES: &[&str] = &[
    "events",
    "committees",
    "countries",
    "delegates",
    "grades",
    "sheets",
    "schools",
];

/// Edit permission guarding a record type, if the type is known.
pub fn edit_permission_for(resource: &str) -> Option<Permission> {
    let perm = match resource {
        "events" => EDIT_EVENTS,
        "committees" => EDIT_COMMITTEES,
        "countries" => EDIT_COUNTRIES,
        "delegates" => EDIT_DELEGATES,
        "grades" => EDIT_GRADES,
        "sheets" => EDIT_SHEETS,
        "schools" => EDIT_SCHOOLS,
        _ => return None,
    };
    Some(perm)
}

/// Unknown record types are never editable.
pub fn can_edit(held: &[Permission], resource: &str) -> bool {
    edit_permission_for(resource).is_some_and(|required| authorized(held, &required))
}

pub fn can_export(held: &[Permission]) -> bool {
    authorized(held, &EXPORT_GRADES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::FULL_ACCESS;

    fn keys(k: &[&'static str]) -> Vec<Permission> {
        k.iter().map(|s| Permission::from(*s)).collect()
    }

    #[test]
    fn listed_routes_and_sub_paths_require_permission() {
        assert_eq!(required_for("/dashboard/events"), Some(&PAGE_EVENTS));
        assert_eq!(required_for("/dashboard/events/"), Some(&PAGE_EVENTS));
        assert_eq!(required_for("/dashboard/events/42/edit"), Some(&PAGE_EVENTS));
        assert_eq!(required_for("/dashboard/eventsx"), None);
        assert_eq!(required_for("/dashboard"), None);
    }

    #[test]
    fn home_is_always_viewable() {
        assert!(can_view_page(&[], "/dashboard", RoutePolicy::DenyUnlisted));
        assert!(can_view_page(&[], "/dashboard/", RoutePolicy::DenyUnlisted));
    }

    #[test]
    fn unlisted_routes_follow_policy() {
        let held = keys(&["page_events"]);
        assert!(can_view_page(&held, "/dashboard/members", RoutePolicy::AllowUnlisted));
        assert!(!can_view_page(&held, "/dashboard/members", RoutePolicy::DenyUnlisted));
        assert!(can_view_page(&[FULL_ACCESS], "/dashboard/members", RoutePolicy::DenyUnlisted));
    }

    #[test]
    fn listed_route_denied_without_permission() {
        let held = keys(&["page_events"]);
        assert!(can_view_page(&held, "/dashboard/events", RoutePolicy::AllowUnlisted));
        assert!(!can_view_page(&held, "/dashboard/delegates", RoutePolicy::AllowUnlisted));
    }

    #[test]
    fn visible_pages_for_full_access_is_whole_table() {
        assert_eq!(visible_pages(&[FULL_ACCESS]).len(), PAGE_ROUTES.len());
        assert_eq!(
            visible_pages(&keys(&["page_grading", "edit_grades"])),
            vec!["/dashboard/grading"]
        );
        assert!(visible_pages(&[]).is_empty());
    }

    #[test]
    fn edit_map_covers_known_resources_only() {
        let held = keys(&["edit_delegates"]);
        assert!(can_edit(&held, "delegates"));
        assert!(!can_edit(&held, "countries"));
        assert!(!can_edit(&[FULL_ACCESS], "spaceships"));
        assert!(can_export(&[FULL_ACCESS]));
        assert!(!can_export(&held));
    }

    #[test]
    fn every_editable_resource_has_an_edit_permission() {
        for resource in EDITABLE_RESOURCES {
            assert!(edit_permission_for(resource).is_some(), "{resource}");
            assert!(can_edit(&[FULL_ACCESS], resource));
        }
    }
}
