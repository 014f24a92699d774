//! Persistence for the permission catalog, accounts and assignments.
//!
//! `AccessStore` is object safe and shared as `Arc<dyn AccessStore>`. The
//! in-memory implementation backs dev/test; the Postgres one backs production.

use async_trait::async_trait;
use thiserror::Error;

use munadmin_auth::{Account, Permission, PermissionDef};
use munadmin_core::PrincipalId;

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryAccessStore;
pub use postgres::PostgresAccessStore;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Referenced account or permission does not exist.
    #[error("not found")]
    NotFound,

    /// Uniqueness or referential integrity would be violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// An assignment names a key that is not in the stored catalog.
    #[error("unknown permission: {0}")]
    UnknownPermission(String),

    /// Storage backend failure (connection, lock poisoning, unexpected row shape).
    #[error("storage backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait AccessStore: Send + Sync {
    // ── catalog ──────────────────────────────────────────────────────────────

    /// Insert the definition unless its key already exists.
    ///
    /// Existing rows are never modified. Returns `true` when a row was inserted.
    async fn insert_permission_if_absent(&self, def: &PermissionDef) -> Result<bool, StoreError>;

    /// All stored definitions in insertion order.
    async fn list_permissions(&self) -> Result<Vec<PermissionDef>, StoreError>;

    /// Hard-delete a catalog entry. `Conflict` while any assignment references it.
    async fn remove_permission(&self, key: &Permission) -> Result<(), StoreError>;

    // ── accounts ─────────────────────────────────────────────────────────────

    /// Insert the account together with its initial assignment set.
    ///
    /// All-or-nothing: `Conflict` if the login name is taken,
    /// `UnknownPermission` if a key is not in the stored catalog. On error
    /// neither the account nor any assignment is written.
    async fn insert_account(&self, account: &Account, keys: &[Permission]) -> Result<(), StoreError>;

    async fn get_account(&self, id: PrincipalId) -> Result<Option<Account>, StoreError>;

    async fn find_account_by_login(&self, login_name: &str) -> Result<Option<Account>, StoreError>;

    /// All accounts ordered by display name.
    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError>;

    async fn set_account_active(&self, id: PrincipalId, active: bool) -> Result<(), StoreError>;

    // ── assignments ──────────────────────────────────────────────────────────

    /// Permission keys currently assigned to the account, sorted.
    async fn permissions_of(&self, id: PrincipalId) -> Result<Vec<Permission>, StoreError>;

    /// Add a single assignment if absent.
    ///
    /// `NotFound` if the account does not exist; `UnknownPermission` if the key
    /// is not catalogued.
    async fn grant_permission(&self, id: PrincipalId, key: &Permission) -> Result<(), StoreError>;

    /// Atomically replace the account's whole assignment set.
    ///
    /// Observers see either the previous set or `keys`, never a mixture.
    /// `NotFound` if the account does not exist; `UnknownPermission` if a key
    /// is not in the stored catalog. On any error the previous set is left intact.
    async fn replace_permissions(&self, id: PrincipalId, keys: &[Permission]) -> Result<(), StoreError>;
}
