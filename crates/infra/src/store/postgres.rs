//! Postgres-backed access store.
//!
//! ## Error Mapping
//!
//! | PostgreSQL code | `StoreError` | Scenario |
//! |-----------------|--------------|----------|
//! | `23505` unique violation | `Conflict` | login name taken |
//! | `23503` foreign key violation | `Conflict` | unknown permission key, or deleting an assigned key |
//! | anything else | `Backend` | connectivity, pool closed, unexpected rows |
//!
//! ## Assignment isolation
//!
//! `replace_permissions` locks the owning `accounts` row (`SELECT … FOR UPDATE`)
//! before deleting and re-inserting. Two replacements for the same account
//! therefore serialize; replacements for different accounts take different
//! row locks and proceed independently.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use munadmin_auth::{Account, Permission, PermissionDef, PermissionKind};
use munadmin_core::PrincipalId;

use super::{AccessStore, StoreError};

const SCHEMA: &str = include_str!("../../migrations/0001_access.sql");

#[derive(Debug, Clone)]
pub struct PostgresAccessStore {
    pool: PgPool,
}

impl PostgresAccessStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Create tables if they do not exist yet.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("migrate", e))?;
        Ok(())
    }
}

#[async_trait]
impl AccessStore for PostgresAccessStore {
    #[instrument(skip(self, def), fields(key = %def.key))]
    async fn insert_permission_if_absent(&self, def: &PermissionDef) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO permissions (key, display_name, description, kind)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (key) DO NOTHING
            "#,
        )
        .bind(def.key.as_str())
        .bind(&def.display_name)
        .bind(&def.description)
        .bind(def.kind.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_permission", e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn list_permissions(&self) -> Result<Vec<PermissionDef>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT key, display_name, description, kind
            FROM permissions
            ORDER BY seq
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_permissions", e))?;

        rows.iter().map(permission_from_row).collect()
    }

    #[instrument(skip(self), fields(key = %key))]
    async fn remove_permission(&self, key: &Permission) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM permissions WHERE key = $1")
            .bind(key.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("remove_permission", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    #[instrument(skip(self, account, keys), fields(login_name = %account.login_name, count = keys.len()))]
    async fn insert_account(&self, account: &Account, keys: &[Permission]) -> Result<(), StoreError> {
        let mut keys: Vec<String> = keys.iter().map(|k| k.as_str().to_string()).collect();
        keys.sort();
        keys.dedup();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        sqlx::query(
            r#"
            INSERT INTO accounts (id, display_name, login_name, credential_hash, is_active)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(account.id.as_uuid())
        .bind(&account.display_name)
        .bind(&account.login_name)
        .bind(&account.credential_hash)
        .bind(account.is_active)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("insert_account", e))?;

        if !keys.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO account_permissions (account_id, permission_key)
                SELECT $1, key FROM UNNEST($2::text[]) AS key
                "#,
            )
            .bind(account.id.as_uuid())
            .bind(&keys)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_assignment_error("insert_assignments", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;
        Ok(())
    }

    async fn get_account(&self, id: PrincipalId) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, display_name, login_name, credential_hash, is_active
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_account", e))?;

        row.as_ref().map(account_from_row).transpose()
    }

    async fn find_account_by_login(&self, login_name: &str) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, display_name, login_name, credential_hash, is_active
            FROM accounts
            WHERE login_name = $1
            "#,
        )
        .bind(login_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_account_by_login", e))?;

        row.as_ref().map(account_from_row).transpose()
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, display_name, login_name, credential_hash, is_active
            FROM accounts
            ORDER BY display_name, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_accounts", e))?;

        rows.iter().map(account_from_row).collect()
    }

    async fn set_account_active(&self, id: PrincipalId, active: bool) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE accounts SET is_active = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(active)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("set_account_active", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn permissions_of(&self, id: PrincipalId) -> Result<Vec<Permission>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT permission_key
            FROM account_permissions
            WHERE account_id = $1
            ORDER BY permission_key
            "#,
        )
        .bind(id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("permissions_of", e))?;

        rows.iter()
            .map(|r| {
                r.try_get::<String, _>("permission_key")
                    .map(Permission::from)
                    .map_err(|e| map_sqlx_error("permissions_of", e))
            })
            .collect()
    }

    async fn grant_permission(&self, id: PrincipalId, key: &Permission) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO account_permissions (account_id, permission_key)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(id.as_uuid())
        .bind(key.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| map_assignment_error("grant_permission", e))?;
        Ok(())
    }

    #[instrument(skip(self, keys), fields(principal_id = %id, count = keys.len()))]
    async fn replace_permissions(&self, id: PrincipalId, keys: &[Permission]) -> Result<(), StoreError> {
        let mut keys: Vec<String> = keys.iter().map(|k| k.as_str().to_string()).collect();
        keys.sort();
        keys.dedup();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        let locked = sqlx::query("SELECT id FROM accounts WHERE id = $1 FOR UPDATE")
            .bind(id.as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("lock_account", e))?;

        if locked.is_none() {
            tx.rollback()
                .await
                .map_err(|e| map_sqlx_error("rollback", e))?;
            return Err(StoreError::NotFound);
        }

        sqlx::query("DELETE FROM account_permissions WHERE account_id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("delete_assignments", e))?;

        if !keys.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO account_permissions (account_id, permission_key)
                SELECT $1, key FROM UNNEST($2::text[]) AS key
                "#,
            )
            .bind(id.as_uuid())
            .bind(&keys)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_assignment_error("insert_assignments", e))?;
        }

        // Dropping `tx` on an early return above rolls back.
        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;
        Ok(())
    }
}

fn permission_from_row(row: &PgRow) -> Result<PermissionDef, StoreError> {
    let read = |col: &str| {
        row.try_get::<String, _>(col)
            .map_err(|e| map_sqlx_error("read_permission_row", e))
    };
    let kind: PermissionKind = read("kind")?.parse().map_err(StoreError::Backend)?;
    Ok(PermissionDef::new(
        Permission::from(read("key")?),
        read("display_name")?,
        read("description")?,
        kind,
    ))
}

fn account_from_row(row: &PgRow) -> Result<Account, StoreError> {
    let map = |e| map_sqlx_error("read_account_row", e);
    Ok(Account {
        id: PrincipalId::from_uuid(row.try_get::<Uuid, _>("id").map_err(map)?),
        display_name: row.try_get("display_name").map_err(map)?,
        login_name: row.try_get("login_name").map_err(map)?,
        credential_hash: row.try_get("credential_hash").map_err(map)?,
        is_active: row.try_get("is_active").map_err(map)?,
    })
}

/// Map SQLx errors to StoreError.
/// Foreign-key failures on `account_permissions` name the missing side.
fn map_assignment_error(operation: &str, err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23503") {
            match db_err.constraint() {
                Some("account_permissions_permission_key_fkey") => {
                    return StoreError::UnknownPermission(db_err.message().to_string());
                }
                Some("account_permissions_account_id_fkey") => return StoreError::NotFound,
                _ => {}
            }
        }
    }
    map_sqlx_error(operation, err)
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23505") | Some("23503") => StoreError::Conflict(msg),
                _ => StoreError::Backend(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::Backend(format!("connection pool closed in {}", operation))
        }
        _ => StoreError::Backend(format!("sqlx error in {}: {}", operation, err)),
    }
}
