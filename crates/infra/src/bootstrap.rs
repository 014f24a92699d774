//! Startup seeding: the permission catalog and the initial administrator.
//!
//! Both steps are idempotent and safe to run on every boot.

use munadmin_auth::{Catalog, NewAccount, PasswordHasher, FULL_ACCESS};
use munadmin_core::PrincipalId;

use crate::access::{hash_blocking, AccessError};
use crate::store::AccessStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub inserted: usize,
    pub existing: usize,
}

/// Insert every catalog entry whose key is not stored yet.
///
/// Existing rows are left untouched, including their display names.
pub async fn ensure_seeded(store: &dyn AccessStore, catalog: &Catalog) -> Result<SeedReport, AccessError> {
    let mut report = SeedReport {
        inserted: 0,
        existing: 0,
    };
    for def in catalog.iter() {
        if store.insert_permission_if_absent(def).await? {
            report.inserted += 1;
        } else {
            report.existing += 1;
        }
    }
    tracing::info!(
        inserted = report.inserted,
        existing = report.existing,
        "permission catalog seeded"
    );
    Ok(report)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminBootstrap {
    pub id: PrincipalId,
    pub created: bool,
}

/// Make sure the bootstrap administrator exists and holds `full_access`.
///
/// An existing account keeps its password and other assignments; only a
/// missing `full_access` grant is restored. Creation inserts the account and
/// its grant together.
pub async fn ensure_admin(
    store: &dyn AccessStore,
    hasher: PasswordHasher,
    login_name: &str,
    password: &str,
) -> Result<AdminBootstrap, AccessError> {
    if let Some(existing) = store.find_account_by_login(login_name).await? {
        store.grant_permission(existing.id, &FULL_ACCESS).await?;
        tracing::debug!(principal_id = %existing.id, "bootstrap administrator present");
        return Ok(AdminBootstrap {
            id: existing.id,
            created: false,
        });
    }

    let request = NewAccount::new("Administrator", login_name, password).validate()?;
    let credential_hash = hash_blocking(hasher, request.password.clone()).await?;
    let account = request.into_account(PrincipalId::new(), credential_hash);
    store.insert_account(&account, &[FULL_ACCESS]).await?;

    tracing::warn!(
        principal_id = %account.id,
        login_name = %account.login_name,
        "bootstrap administrator created; rotate its password"
    );
    Ok(AdminBootstrap {
        id: account.id,
        created: true,
    })
}
