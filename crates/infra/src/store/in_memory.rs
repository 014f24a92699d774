use std::collections::{BTreeSet, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use munadmin_auth::{Account, Permission, PermissionDef};
use munadmin_core::PrincipalId;

use super::{AccessStore, StoreError};

#[derive(Debug, Default)]
struct Tables {
    permissions: Vec<PermissionDef>,
    accounts: HashMap<PrincipalId, Account>,
    assignments: HashMap<PrincipalId, BTreeSet<Permission>>,
}

impl Tables {
    fn has_permission(&self, key: &Permission) -> bool {
        self.permissions.iter().any(|d| &d.key == key)
    }
}

/// In-memory access store.
///
/// Intended for tests/dev. All tables sit behind one lock, so an assignment
/// replacement is a single swap under the write guard.
#[derive(Debug, Default)]
pub struct InMemoryAccessStore {
    tables: RwLock<Tables>,
}

impl InMemoryAccessStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|_| StoreError::Backend("in-memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables
            .write()
            .map_err(|_| StoreError::Backend("in-memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl AccessStore for InMemoryAccessStore {
    async fn insert_permission_if_absent(&self, def: &PermissionDef) -> Result<bool, StoreError> {
        let mut t = self.write()?;
        if t.has_permission(&def.key) {
            return Ok(false);
        }
        t.permissions.push(def.clone());
        Ok(true)
    }

    async fn list_permissions(&self) -> Result<Vec<PermissionDef>, StoreError> {
        Ok(self.read()?.permissions.clone())
    }

    async fn remove_permission(&self, key: &Permission) -> Result<(), StoreError> {
        let mut t = self.write()?;
        if !t.has_permission(key) {
            return Err(StoreError::NotFound);
        }
        if t.assignments.values().any(|keys| keys.contains(key)) {
            return Err(StoreError::Conflict(format!(
                "permission '{key}' is still assigned"
            )));
        }
        t.permissions.retain(|d| &d.key != key);
        Ok(())
    }

    async fn insert_account(&self, account: &Account, keys: &[Permission]) -> Result<(), StoreError> {
        let mut t = self.write()?;
        if t.accounts.values().any(|a| a.login_name == account.login_name) {
            return Err(StoreError::Conflict(format!(
                "login name '{}' is taken",
                account.login_name
            )));
        }
        if t.accounts.contains_key(&account.id) {
            return Err(StoreError::Conflict(format!("account {} exists", account.id)));
        }
        if let Some(missing) = keys.iter().find(|k| !t.has_permission(k)) {
            return Err(StoreError::UnknownPermission(missing.to_string()));
        }

        t.accounts.insert(account.id, account.clone());
        let initial: BTreeSet<Permission> = keys.iter().cloned().collect();
        if !initial.is_empty() {
            t.assignments.insert(account.id, initial);
        }
        Ok(())
    }

    async fn get_account(&self, id: PrincipalId) -> Result<Option<Account>, StoreError> {
        Ok(self.read()?.accounts.get(&id).cloned())
    }

    async fn find_account_by_login(&self, login_name: &str) -> Result<Option<Account>, StoreError> {
        Ok(self
            .read()?
            .accounts
            .values()
            .find(|a| a.login_name == login_name)
            .cloned())
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
        let mut accounts: Vec<Account> = self.read()?.accounts.values().cloned().collect();
        accounts.sort_by(|a, b| a.display_name.cmp(&b.display_name).then(a.id.cmp(&b.id)));
        Ok(accounts)
    }

    async fn set_account_active(&self, id: PrincipalId, active: bool) -> Result<(), StoreError> {
        let mut t = self.write()?;
        let account = t.accounts.get_mut(&id).ok_or(StoreError::NotFound)?;
        account.is_active = active;
        Ok(())
    }

    async fn permissions_of(&self, id: PrincipalId) -> Result<Vec<Permission>, StoreError> {
        Ok(self
            .read()?
            .assignments
            .get(&id)
            .map(|keys| keys.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn grant_permission(&self, id: PrincipalId, key: &Permission) -> Result<(), StoreError> {
        let mut t = self.write()?;
        if !t.accounts.contains_key(&id) {
            return Err(StoreError::NotFound);
        }
        if !t.has_permission(key) {
            return Err(StoreError::UnknownPermission(key.to_string()));
        }
        t.assignments.entry(id).or_default().insert(key.clone());
        Ok(())
    }

    async fn replace_permissions(&self, id: PrincipalId, keys: &[Permission]) -> Result<(), StoreError> {
        let mut t = self.write()?;
        if !t.accounts.contains_key(&id) {
            return Err(StoreError::NotFound);
        }
        if let Some(missing) = keys.iter().find(|k| !t.has_permission(k)) {
            return Err(StoreError::UnknownPermission(missing.to_string()));
        }

        let next: BTreeSet<Permission> = keys.iter().cloned().collect();
        if next.is_empty() {
            t.assignments.remove(&id);
        } else {
            t.assignments.insert(id, next);
        }
        Ok(())
    }
}
