//! Principal accounts (chairs and administrators).
//!
//! Accounts are deactivated rather than deleted once other records point at
//! them; an inactive account keeps its assignments but cannot log in.

use serde::{Deserialize, Serialize};

use munadmin_core::{DomainError, PrincipalId};

use crate::permissions::Permission;

// ─────────────────────────────────────────────────────────────────────────────
// Stored account
// ─────────────────────────────────────────────────────────────────────────────

/// An authenticatable actor as persisted.
///
/// `credential_hash` never leaves the server; use [`AccountSummary`] for
/// anything rendered to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: PrincipalId,
    pub display_name: String,
    pub login_name: String,
    pub credential_hash: String,
    pub is_active: bool,
}

/// Client-safe view of an account together with its current permission keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub id: PrincipalId,
    pub display_name: String,
    pub login_name: String,
    pub is_active: bool,
    pub permissions: Vec<Permission>,
}

impl AccountSummary {
    pub fn new(account: &Account, permissions: Vec<Permission>) -> Self {
        Self {
            id: account.id,
            display_name: account.display_name.clone(),
            login_name: account.login_name.clone(),
            is_active: account.is_active,
            permissions,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Account creation
// ─────────────────────────────────────────────────────────────────────────────

/// Request to create an account, before hashing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewAccount {
    pub display_name: String,
    pub login_name: String,
    pub password: String,
}

impl NewAccount {
    pub fn new(
        display_name: impl Into<String>,
        login_name: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            login_name: login_name.into(),
            password: password.into(),
        }
    }

    /// Trim names and check the request is usable.
    pub fn validate(self) -> Result<Self, DomainError> {
        let display_name = self.display_name.trim().to_string();
        let login_name = self.login_name.trim().to_string();

        if display_name.is_empty() {
            return Err(DomainError::validation("display name cannot be empty"));
        }
        if login_name.is_empty() {
            return Err(DomainError::validation("login name cannot be empty"));
        }
        if login_name.chars().any(char::is_whitespace) {
            return Err(DomainError::validation("login name cannot contain whitespace"));
        }
        if self.password.is_empty() {
            return Err(DomainError::validation("password cannot be empty"));
        }

        Ok(Self {
            display_name,
            login_name,
            password: self.password,
        })
    }

    /// Materialize the stored account once the password has been hashed.
    pub fn into_account(self, id: PrincipalId, credential_hash: String) -> Account {
        Account {
            id,
            display_name: self.display_name,
            login_name: self.login_name,
            credential_hash,
            is_active: true,
        }
    }
}
