//! Login credential check.
//!
//! Every rejection collapses into the same [`InvalidCredentials`] value; the
//! specific reason is only logged.

use std::sync::OnceLock;

use thiserror::Error;

use crate::account::Account;
use crate::password::{PasswordError, PasswordHasher};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("invalid credentials")]
pub struct InvalidCredentials;

/// Server-side reason for a rejected login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginRejection {
    UnknownLogin,
    Inactive,
    BadPassword,
}

impl LoginRejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoginRejection::UnknownLogin => "unknown_login",
            LoginRejection::Inactive => "inactive",
            LoginRejection::BadPassword => "bad_password",
        }
    }
}

/// Well-formed cost-10 bcrypt hash, used if the decoy cannot be generated.
const FALLBACK_DECOY_HASH: &str = "$2a$10$N9qo8uLOickgx2ZMRZoMyeIjZAgcfl7p92ldGxad68LJZdL17lhWy";

// Verified against when the login name is unknown so that the response time
// does not reveal whether an account exists.
fn decoy_hash(hasher: &PasswordHasher) -> &'static str {
    static DECOY: OnceLock<String> = OnceLock::new();
    DECOY.get_or_init(|| decoy_or_fallback(hasher.hash("decoy-password")))
}

// An empty decoy would fail to parse and return instantly.
fn decoy_or_fallback(generated: Result<String, PasswordError>) -> String {
    match generated {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!(error = %e, "decoy hash generation failed; using built-in decoy");
            FALLBACK_DECOY_HASH.to_string()
        }
    }
}

fn classify<'a>(
    account: Option<&'a Account>,
    raw_password: &str,
    hasher: &PasswordHasher,
) -> Result<&'a Account, LoginRejection> {
    let Some(account) = account else {
        let _ = hasher.verify(raw_password, decoy_hash(hasher));
        return Err(LoginRejection::UnknownLogin);
    };

    let password_ok = hasher.verify(raw_password, &account.credential_hash);

    if !account.is_active {
        return Err(LoginRejection::Inactive);
    }
    if !password_ok {
        return Err(LoginRejection::BadPassword);
    }
    Ok(account)
}

/// Check a login attempt against the looked-up account (if any).
///
/// Inactive accounts are rejected even with the correct password.
pub fn check_credentials<'a>(
    login_name: &str,
    account: Option<&'a Account>,
    raw_password: &str,
    hasher: &PasswordHasher,
) -> Result<&'a Account, InvalidCredentials> {
    classify(account, raw_password, hasher).map_err(|reason| {
        tracing::info!(login_name = %login_name, reason = reason.as_str(), "login rejected");
        InvalidCredentials
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use munadmin_core::PrincipalId;

    fn account(hasher: &PasswordHasher, active: bool) -> Account {
        Account {
            id: PrincipalId::new(),
            display_name: "Chair".to_string(),
            login_name: "chair".to_string(),
            credential_hash: hasher.hash("correct horse").unwrap(),
            is_active: active,
        }
    }

    #[test]
    fn correct_password_on_active_account_passes() {
        let hasher = PasswordHasher::default();
        let acc = account(&hasher, true);
        let ok = check_credentials("chair", Some(&acc), "correct horse", &hasher).unwrap();
        assert_eq!(ok.id, acc.id);
    }

    #[test]
    fn reasons_are_distinguished_internally() {
        let hasher = PasswordHasher::default();
        let active = account(&hasher, true);
        let inactive = account(&hasher, false);

        assert_eq!(
            classify(None, "correct horse", &hasher).unwrap_err(),
            LoginRejection::UnknownLogin
        );
        assert_eq!(
            classify(Some(&inactive), "correct horse", &hasher).unwrap_err(),
            LoginRejection::Inactive
        );
        assert_eq!(
            classify(Some(&active), "wrong", &hasher).unwrap_err(),
            LoginRejection::BadPassword
        );
    }

    #[test]
    fn every_rejection_looks_the_same() {
        let hasher = PasswordHasher::default();
        let active = account(&hasher, true);
        let inactive = account(&hasher, false);

        let results = [
            check_credentials("ghost", None, "correct horse", &hasher).map(|a| a.id),
            check_credentials("chair", Some(&inactive), "correct horse", &hasher).map(|a| a.id),
            check_credentials("chair", Some(&active), "wrong", &hasher).map(|a| a.id),
        ];
        for r in results {
            assert_eq!(r, Err(InvalidCredentials));
        }
    }

    #[test]
    fn decoy_falls_back_to_a_verifiable_hash() {
        let decoy = decoy_or_fallback(Err(PasswordError::Hash("rng unavailable".to_string())));
        assert_eq!(decoy, FALLBACK_DECOY_HASH);
        assert!(matches!(bcrypt::verify("decoy-password", &decoy), Ok(false)));
    }
}
