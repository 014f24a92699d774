use proptest::prelude::*;

use munadmin_auth::routes::{visible_pages, PAGE_ROUTES};
use munadmin_auth::{authorized, Permission, PermissionSet, FULL_ACCESS};

fn key() -> impl Strategy<Value = Permission> {
    prop_oneof![
        Just(Permission::from("page_events")),
        Just(Permission::from("page_delegates")),
        Just(Permission::from("edit_delegates")),
        Just(Permission::from("export_grades")),
        "[a-z_]{1,16}".prop_map(Permission::from),
    ]
}

fn set_without_full_access() -> impl Strategy<Value = PermissionSet> {
    prop::collection::vec(key(), 0..8).prop_map(|keys| {
        keys.into_iter().filter(|k| !k.is_full_access()).collect()
    })
}

proptest! {
    #[test]
    fn full_access_authorizes_any_key(mut held in set_without_full_access(), required in key()) {
        held.insert(FULL_ACCESS);
        prop_assert!(authorized(&held, &required));
    }

    #[test]
    fn without_full_access_decision_is_membership(held in set_without_full_access(), required in key()) {
        prop_assume!(!required.is_full_access());
        prop_assert_eq!(authorized(&held, &required), held.contains(&required));
    }

    #[test]
    fn visible_pages_never_exceed_held_page_keys(held in set_without_full_access()) {
        let held_vec = held.to_vec();
        for path in visible_pages(&held_vec) {
            let route = PAGE_ROUTES.iter().find(|r| r.path == path).unwrap();
            prop_assert!(held.contains(&route.required));
        }
    }
}
