//! Access service: login, session resolution and permission administration.
//!
//! ## Flow
//!
//! ```text
//! login  → lookup by login name → credential check → permission snapshot → signed token
//! request → token → Principal (snapshot or live lookup) → decision function → handler
//! ```
//!
//! Every administrative operation takes the acting [`Principal`] and checks
//! its permission before touching the store.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use munadmin_auth::permissions::{MANAGE_USERS, PAGE_USERS};
use munadmin_auth::{
    authorize, authorized, check_credentials, Account, AccountSummary, AuthzError, Catalog,
    InvalidCredentials, NewAccount, PasswordHasher, Permission, PermissionDef, Principal,
    SessionClaims, SessionTokens, TokenError,
};
use munadmin_core::{DomainError, PrincipalId};

use crate::store::{AccessStore, StoreError};

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// Unknown login, inactive account or wrong password (indistinguishable).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No valid session.
    #[error("unauthorized")]
    Unauthorized,

    /// Valid session, insufficient permission.
    #[error("forbidden")]
    Forbidden,

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("not found")]
    NotFound,

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for AccessError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound => AccessError::NotFound,
            StoreError::Conflict(msg) => AccessError::Conflict(msg),
            StoreError::UnknownPermission(key) => {
                AccessError::Validation(format!("unknown permission keys: {key}"))
            }
            StoreError::Backend(msg) => AccessError::Internal(msg),
        }
    }
}

impl From<DomainError> for AccessError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) | DomainError::InvalidId(msg) => AccessError::Validation(msg),
            DomainError::NotFound => AccessError::NotFound,
            DomainError::Conflict(msg) => AccessError::Conflict(msg),
        }
    }
}

impl From<InvalidCredentials> for AccessError {
    fn from(_: InvalidCredentials) -> Self {
        AccessError::InvalidCredentials
    }
}

impl From<AuthzError> for AccessError {
    fn from(value: AuthzError) -> Self {
        let AuthzError::Forbidden(missing) = value;
        tracing::debug!(missing = %missing, "permission check failed");
        AccessError::Forbidden
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Settings
// ─────────────────────────────────────────────────────────────────────────────

/// Where a request's permissions come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    /// Use the snapshot embedded in the token at login. Changes made after
    /// login are invisible until the principal logs in again.
    #[default]
    Snapshot,
    /// Reload the account and its permissions on every request. Deactivation
    /// and revocation take effect immediately at the cost of a store lookup.
    Live,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    /// Absolute token lifetime; there is no sliding renewal.
    pub ttl: Duration,
    pub mode: SessionMode,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            ttl: Duration::days(30),
            mode: SessionMode::Snapshot,
        }
    }
}

/// An issued session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub principal: Principal,
    pub expires_at: DateTime<Utc>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Service
// ─────────────────────────────────────────────────────────────────────────────

pub struct AccessService {
    store: Arc<dyn AccessStore>,
    tokens: Arc<dyn SessionTokens>,
    hasher: PasswordHasher,
    settings: SessionSettings,
}

impl AccessService {
    pub fn new(
        store: Arc<dyn AccessStore>,
        tokens: Arc<dyn SessionTokens>,
        hasher: PasswordHasher,
        settings: SessionSettings,
    ) -> Self {
        Self {
            store,
            tokens,
            hasher,
            settings,
        }
    }

    /// The catalog as stored right now. Entries removed at runtime are gone
    /// from it even though the built-in catalog still lists them.
    pub async fn current_catalog(&self) -> Result<Catalog, AccessError> {
        let defs = self.store.list_permissions().await?;
        Catalog::try_new(defs).map_err(|e| AccessError::Internal(e.to_string()))
    }

    pub fn settings(&self) -> SessionSettings {
        self.settings
    }

    pub fn store(&self) -> &Arc<dyn AccessStore> {
        &self.store
    }

    /// Exchange login credentials for a signed session.
    pub async fn authenticate(&self, login_name: &str, raw_password: &str) -> Result<Session, AccessError> {
        let login_name = login_name.trim().to_string();
        let found = self.store.find_account_by_login(&login_name).await?;

        let hasher = self.hasher;
        let raw_password = raw_password.to_string();
        let login_for_check = login_name.clone();
        let account: Account = tokio::task::spawn_blocking(move || {
            check_credentials(&login_for_check, found.as_ref(), &raw_password, &hasher).cloned()
        })
        .await
        .map_err(|e| AccessError::Internal(format!("credential check aborted: {e}")))??;

        let permissions = self.store.permissions_of(account.id).await?;
        let claims = SessionClaims::new(
            account.id,
            account.display_name.clone(),
            account.login_name.clone(),
            permissions,
            Utc::now(),
            self.settings.ttl,
        );
        let token = self.tokens.issue(&claims).map_err(|e| match e {
            TokenError::Encode(msg) => AccessError::Internal(msg),
            other => AccessError::Internal(other.to_string()),
        })?;

        tracing::info!(
            principal_id = %account.id,
            login_name = %account.login_name,
            permissions = claims.permissions.len(),
            "session issued"
        );

        let expires_at = claims.expires_at;
        Ok(Session {
            token,
            principal: Principal::from(claims),
            expires_at,
        })
    }

    /// Resolve a presented token to the acting principal.
    pub async fn resolve(&self, token: &str) -> Result<Principal, AccessError> {
        let claims = self.tokens.validate(token, Utc::now()).map_err(|e| {
            tracing::debug!(error = %e, "session rejected");
            AccessError::Unauthorized
        })?;

        match self.settings.mode {
            SessionMode::Snapshot => Ok(Principal::from(claims)),
            SessionMode::Live => {
                let account = self
                    .store
                    .get_account(claims.sub)
                    .await?
                    .filter(|a| a.is_active)
                    .ok_or(AccessError::Unauthorized)?;
                let permissions = self.store.permissions_of(account.id).await?;
                Ok(Principal {
                    principal_id: account.id,
                    display_name: account.display_name,
                    login_name: account.login_name,
                    permissions: permissions.into_iter().collect(),
                })
            }
        }
    }

    /// Replace a principal's whole permission set.
    ///
    /// The actor needs `manage_users`; unless it holds `full_access` it can
    /// only add or remove keys it holds itself. Keys missing from the stored
    /// catalog are rejected before the store is touched. Returns the resulting set.
    pub async fn assign_permissions(
        &self,
        actor: &Principal,
        principal_id: PrincipalId,
        keys: Vec<Permission>,
    ) -> Result<Vec<Permission>, AccessError> {
        authorize(actor, &MANAGE_USERS)?;

        let mut keys = keys;
        keys.sort();
        keys.dedup();
        self.ensure_catalogued(&keys).await?;

        let current = match self.store.get_account(principal_id).await? {
            Some(_) => self.store.permissions_of(principal_id).await?,
            None => return Err(AccessError::Validation("principal does not exist".to_string())),
        };
        let added = keys.iter().filter(|k| !current.contains(k));
        let removed = current.iter().filter(|k| !keys.contains(k));
        self.ensure_no_escalation(actor, added.chain(removed))?;

        match self.store.replace_permissions(principal_id, &keys).await {
            Ok(()) => {}
            Err(StoreError::NotFound) => {
                return Err(AccessError::Validation("principal does not exist".to_string()));
            }
            // A catalog entry was deleted between the check above and the write.
            Err(e @ StoreError::UnknownPermission(_)) => return Err(e.into()),
            Err(e) => {
                tracing::error!(principal_id = %principal_id, error = %e, "permission assignment failed");
                return Err(AccessError::Internal("permission assignment failed".to_string()));
            }
        }

        tracing::info!(
            actor = %actor.principal_id,
            principal_id = %principal_id,
            count = keys.len(),
            "permissions replaced"
        );
        Ok(keys)
    }

    /// Create an account with an initial permission set.
    pub async fn create_account(
        &self,
        actor: &Principal,
        request: NewAccount,
        keys: Vec<Permission>,
    ) -> Result<AccountSummary, AccessError> {
        authorize(actor, &MANAGE_USERS)?;

        let request = request.validate()?;
        let mut keys = keys;
        keys.sort();
        keys.dedup();
        self.ensure_catalogued(&keys).await?;
        self.ensure_no_escalation(actor, keys.iter())?;

        if self.store.find_account_by_login(&request.login_name).await?.is_some() {
            return Err(AccessError::Conflict(format!(
                "login name '{}' is taken",
                request.login_name
            )));
        }

        let credential_hash = hash_blocking(self.hasher, request.password.clone()).await?;
        let account = request.into_account(PrincipalId::new(), credential_hash);
        self.store.insert_account(&account, &keys).await?;

        tracing::info!(
            actor = %actor.principal_id,
            principal_id = %account.id,
            login_name = %account.login_name,
            "account created"
        );
        Ok(AccountSummary::new(&account, keys))
    }

    /// Soft (de)activation. Actors cannot deactivate themselves.
    pub async fn set_active(
        &self,
        actor: &Principal,
        principal_id: PrincipalId,
        active: bool,
    ) -> Result<AccountSummary, AccessError> {
        authorize(actor, &MANAGE_USERS)?;

        if !active && actor.principal_id == principal_id {
            return Err(AccessError::Validation("cannot deactivate your own account".to_string()));
        }

        self.store.set_account_active(principal_id, active).await?;
        let account = self
            .store
            .get_account(principal_id)
            .await?
            .ok_or(AccessError::NotFound)?;
        let permissions = self.store.permissions_of(principal_id).await?;

        tracing::info!(
            actor = %actor.principal_id,
            principal_id = %principal_id,
            active,
            "account activation changed"
        );
        Ok(AccountSummary::new(&account, permissions))
    }

    pub async fn list_accounts(&self, actor: &Principal) -> Result<Vec<AccountSummary>, AccessError> {
        authorize(actor, &PAGE_USERS)?;

        let accounts = self.store.list_accounts().await?;
        let mut out = Vec::with_capacity(accounts.len());
        for account in &accounts {
            let permissions = self.store.permissions_of(account.id).await?;
            out.push(AccountSummary::new(account, permissions));
        }
        Ok(out)
    }

    pub async fn list_permissions(&self) -> Result<Vec<PermissionDef>, AccessError> {
        Ok(self.store.list_permissions().await?)
    }

    /// Hard-delete a catalog entry that nobody holds.
    pub async fn remove_permission(&self, actor: &Principal, key: &Permission) -> Result<(), AccessError> {
        authorize(actor, &MANAGE_USERS)?;
        self.store.remove_permission(key).await?;
        tracing::info!(actor = %actor.principal_id, key = %key, "permission removed");
        Ok(())
    }

    async fn ensure_catalogued(&self, keys: &[Permission]) -> Result<(), AccessError> {
        if keys.is_empty() {
            return Ok(());
        }
        let unknown = self.current_catalog().await?.unknown_keys(keys);
        if unknown.is_empty() {
            return Ok(());
        }
        let list: Vec<&str> = unknown.iter().map(Permission::as_str).collect();
        Err(AccessError::Validation(format!(
            "unknown permission keys: {}",
            list.join(", ")
        )))
    }

    fn ensure_no_escalation<'a>(
        &self,
        actor: &Principal,
        changed: impl IntoIterator<Item = &'a Permission>,
    ) -> Result<(), AccessError> {
        for key in changed {
            if !authorized(&actor.permissions, key) {
                tracing::info!(
                    actor = %actor.principal_id,
                    key = %key,
                    "refused to change a permission the actor does not hold"
                );
                return Err(AccessError::Forbidden);
            }
        }
        Ok(())
    }
}

/// bcrypt is deliberately slow; keep it off the async workers.
pub(crate) async fn hash_blocking(hasher: PasswordHasher, raw_password: String) -> Result<String, AccessError> {
    tokio::task::spawn_blocking(move || hasher.hash(&raw_password))
        .await
        .map_err(|e| AccessError::Internal(format!("password hashing aborted: {e}")))?
        .map_err(|e| AccessError::Internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use munadmin_auth::{Hs256SessionTokens, PermissionSet, FULL_ACCESS};

    use super::*;
    use crate::bootstrap::{ensure_admin, ensure_seeded};
    use crate::store::InMemoryAccessStore;

    struct Fixture {
        service: AccessService,
        admin: Principal,
    }

    async fn fixture(mode: SessionMode) -> Fixture {
        let store: Arc<dyn AccessStore> = Arc::new(InMemoryAccessStore::new());
        ensure_seeded(store.as_ref(), &Catalog::standard()).await.unwrap();
        ensure_admin(store.as_ref(), PasswordHasher::default(), "admin", "admin123")
            .await
            .unwrap();

        let service = AccessService::new(
            store,
            Arc::new(Hs256SessionTokens::new("test-secret")),
            PasswordHasher::default(),
            SessionSettings {
                ttl: Duration::days(30),
                mode,
            },
        );
        let admin = service.authenticate("admin", "admin123").await.unwrap().principal;
        Fixture { service, admin }
    }

    fn keys(k: &[&'static str]) -> Vec<Permission> {
        k.iter().map(|s| Permission::from(*s)).collect()
    }

    async fn chair(f: &Fixture, login: &str, initial: &[&'static str]) -> PrincipalId {
        f.service
            .create_account(&f.admin, NewAccount::new("Chair", login, "chair-pw"), keys(initial))
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn login_embeds_current_permission_snapshot() {
        let f = fixture(SessionMode::Snapshot).await;
        chair(&f, "chair", &["page_delegates"]).await;

        let session = f.service.authenticate("chair", "chair-pw").await.unwrap();
        assert_eq!(session.principal.permissions.to_vec(), keys(&["page_delegates"]));
        assert!(session.expires_at > Utc::now() + Duration::days(29));

        let resolved = f.service.resolve(&session.token).await.unwrap();
        assert_eq!(resolved, session.principal);
    }

    #[tokio::test]
    async fn inactive_principal_cannot_authenticate() {
        let f = fixture(SessionMode::Snapshot).await;
        let id = chair(&f, "chair", &[]).await;
        f.service.set_active(&f.admin, id, false).await.unwrap();

        assert_eq!(
            f.service.authenticate("chair", "chair-pw").await,
            Err(AccessError::InvalidCredentials)
        );
        assert_eq!(
            f.service.authenticate("chair", "wrong").await,
            Err(AccessError::InvalidCredentials)
        );
        assert_eq!(
            f.service.authenticate("nobody", "chair-pw").await,
            Err(AccessError::InvalidCredentials)
        );
    }

    #[tokio::test]
    async fn assignment_is_idempotent_and_empty_list_revokes() {
        let f = fixture(SessionMode::Snapshot).await;
        let id = chair(&f, "chair", &["page_events"]).await;

        let set = keys(&["page_delegates", "edit_delegates"]);
        f.service.assign_permissions(&f.admin, id, set.clone()).await.unwrap();
        f.service.assign_permissions(&f.admin, id, set).await.unwrap();
        assert_eq!(
            f.service.store().permissions_of(id).await.unwrap(),
            keys(&["edit_delegates", "page_delegates"])
        );

        f.service.assign_permissions(&f.admin, id, vec![]).await.unwrap();
        assert!(f.service.store().permissions_of(id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_keys_and_principals_are_validation_errors() {
        let f = fixture(SessionMode::Snapshot).await;
        let id = chair(&f, "chair", &["page_events"]).await;

        let err = f
            .service
            .assign_permissions(&f.admin, id, keys(&["page_events", "launch_rockets"]))
            .await
            .unwrap_err();
        assert_eq!(err, AccessError::Validation("unknown permission keys: launch_rockets".into()));
        assert_eq!(f.service.store().permissions_of(id).await.unwrap(), keys(&["page_events"]));

        let err = f
            .service
            .assign_permissions(&f.admin, PrincipalId::new(), keys(&["page_events"]))
            .await
            .unwrap_err();
        assert!(matches!(err, AccessError::Validation(_)));
    }

    #[tokio::test]
    async fn assignment_requires_manage_users() {
        let f = fixture(SessionMode::Snapshot).await;
        let id = chair(&f, "chair", &["page_users"]).await;
        let actor = f.service.authenticate("chair", "chair-pw").await.unwrap().principal;

        assert_eq!(
            f.service.assign_permissions(&actor, id, keys(&["page_users"])).await,
            Err(AccessError::Forbidden)
        );
    }

    #[tokio::test]
    async fn managers_cannot_grant_what_they_do_not_hold() {
        let f = fixture(SessionMode::Snapshot).await;
        chair(&f, "manager", &["manage_users", "page_events"]).await;
        let target = chair(&f, "target", &[]).await;
        let manager = f.service.authenticate("manager", "chair-pw").await.unwrap().principal;

        assert_eq!(
            f.service
                .assign_permissions(&manager, target, vec![FULL_ACCESS])
                .await,
            Err(AccessError::Forbidden)
        );
        assert!(f
            .service
            .assign_permissions(&manager, target, keys(&["page_events"]))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn snapshot_mode_keeps_stale_permissions_until_relogin() {
        let f = fixture(SessionMode::Snapshot).await;
        let id = chair(&f, "chair", &["page_delegates"]).await;
        let session = f.service.authenticate("chair", "chair-pw").await.unwrap();

        f.service.assign_permissions(&f.admin, id, vec![]).await.unwrap();

        let stale = f.service.resolve(&session.token).await.unwrap();
        assert_eq!(stale.permissions.to_vec(), keys(&["page_delegates"]));

        let fresh = f.service.authenticate("chair", "chair-pw").await.unwrap();
        assert!(fresh.principal.permissions.is_empty());
    }

    #[tokio::test]
    async fn live_mode_sees_revocation_and_deactivation() {
        let f = fixture(SessionMode::Live).await;
        let id = chair(&f, "chair", &["page_delegates"]).await;
        let session = f.service.authenticate("chair", "chair-pw").await.unwrap();

        f.service.assign_permissions(&f.admin, id, vec![]).await.unwrap();
        let live = f.service.resolve(&session.token).await.unwrap();
        assert_eq!(live.permissions, PermissionSet::new());

        f.service.set_active(&f.admin, id, false).await.unwrap();
        assert_eq!(f.service.resolve(&session.token).await, Err(AccessError::Unauthorized));
    }

    #[tokio::test]
    async fn garbage_token_is_unauthorized() {
        let f = fixture(SessionMode::Snapshot).await;
        assert_eq!(f.service.resolve("garbage").await, Err(AccessError::Unauthorized));
    }

    #[tokio::test]
    async fn duplicate_login_is_conflict() {
        let f = fixture(SessionMode::Snapshot).await;
        chair(&f, "chair", &[]).await;
        let err = f
            .service
            .create_account(&f.admin, NewAccount::new("Other", "chair", "pw"), vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, AccessError::Conflict(_)));
    }

    #[tokio::test]
    async fn actors_cannot_deactivate_themselves() {
        let f = fixture(SessionMode::Snapshot).await;
        let err = f
            .service
            .set_active(&f.admin, f.admin.principal_id, false)
            .await
            .unwrap_err();
        assert!(matches!(err, AccessError::Validation(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_assignments_for_different_principals_both_complete() {
        let f = Arc::new(fixture(SessionMode::Snapshot).await);
        let a = chair(&f, "chair-a", &[]).await;
        let b = chair(&f, "chair-b", &[]).await;

        let mut handles = Vec::new();
        for (id, set) in [
            (a, keys(&["page_events", "edit_events"])),
            (b, keys(&["page_delegates", "edit_delegates"])),
        ] {
            let f = f.clone();
            handles.push(tokio::spawn(async move {
                for _ in 0..50 {
                    f.service.assign_permissions(&f.admin, id, set.clone()).await.unwrap();
                }
            }));
        }

        let all = async {
            for h in handles {
                h.await.unwrap();
            }
        };
        tokio::time::timeout(std::time::Duration::from_secs(10), all)
            .await
            .expect("assignments for different principals should not block each other");

        assert_eq!(
            f.service.store().permissions_of(a).await.unwrap(),
            keys(&["edit_events", "page_events"])
        );
        assert_eq!(
            f.service.store().permissions_of(b).await.unwrap(),
            keys(&["edit_delegates", "page_delegates"])
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_assignments_for_same_principal_never_merge() {
        let f = Arc::new(fixture(SessionMode::Snapshot).await);
        let id = chair(&f, "chair", &[]).await;
        let first = keys(&["edit_events", "page_events"]);
        let second = keys(&["edit_delegates", "page_delegates"]);

        let mut handles = Vec::new();
        for set in [first.clone(), second.clone()] {
            let f = f.clone();
            handles.push(tokio::spawn(async move {
                for _ in 0..25 {
                    f.service.assign_permissions(&f.admin, id, set.clone()).await.unwrap();
                }
            }));
        }
        for h in handles {
            h.await.unwrap();
        }

        let end = f.service.store().permissions_of(id).await.unwrap();
        assert!(end == first || end == second, "merged set: {end:?}");
    }

    #[tokio::test]
    async fn deleted_catalog_entries_are_rejected_as_validation() {
        let f = fixture(SessionMode::Snapshot).await;
        let id = chair(&f, "chair", &["page_sheets"]).await;
        f.service
            .remove_permission(&f.admin, &Permission::from("edit_sheets"))
            .await
            .unwrap();

        let err = f
            .service
            .assign_permissions(&f.admin, id, keys(&["page_sheets", "edit_sheets"]))
            .await
            .unwrap_err();
        assert_eq!(err, AccessError::Validation("unknown permission keys: edit_sheets".into()));
        assert_eq!(f.service.store().permissions_of(id).await.unwrap(), keys(&["page_sheets"]));

        let catalog = f.service.current_catalog().await.unwrap();
        assert!(!catalog.contains(&Permission::from("edit_sheets")));
        assert!(catalog.contains(&Permission::from("page_sheets")));
    }

    #[tokio::test]
    async fn failed_account_creation_leaves_nothing_behind() {
        let f = fixture(SessionMode::Snapshot).await;
        f.service
            .remove_permission(&f.admin, &Permission::from("edit_grades"))
            .await
            .unwrap();

        let err = f
            .service
            .create_account(
                &f.admin,
                NewAccount::new("Chair", "chair", "chair-pw"),
                keys(&["page_grading", "edit_grades"]),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AccessError::Validation(_)));
        assert_eq!(f.service.store().find_account_by_login("chair").await.unwrap(), None);

        let retried = f
            .service
            .create_account(
                &f.admin,
                NewAccount::new("Chair", "chair", "chair-pw"),
                keys(&["page_grading"]),
            )
            .await
            .unwrap();
        assert_eq!(
            f.service.store().permissions_of(retried.id).await.unwrap(),
            keys(&["page_grading"])
        );
    }

    #[tokio::test]
    async fn managers_cannot_revoke_what_they_do_not_hold() {
        let f = fixture(SessionMode::Snapshot).await;
        chair(&f, "manager", &["manage_users", "page_events"]).await;
        let manager = f.service.authenticate("manager", "chair-pw").await.unwrap().principal;
        let target = chair(&f, "target", &["page_events", "page_grading"]).await;

        assert_eq!(
            f.service
                .assign_permissions(&manager, f.admin.principal_id, vec![])
                .await,
            Err(AccessError::Forbidden)
        );
        assert_eq!(
            f.service.store().permissions_of(f.admin.principal_id).await.unwrap(),
            vec![FULL_ACCESS]
        );

        assert_eq!(
            f.service
                .assign_permissions(&manager, target, keys(&["page_events"]))
                .await,
            Err(AccessError::Forbidden)
        );
        assert!(f
            .service
            .assign_permissions(&manager, target, keys(&["page_grading"]))
            .await
            .is_ok());
    }
}
