use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use munadmin_core::PrincipalId;

use crate::permissions::Permission;

/// Session token claims.
///
/// The permission list is a snapshot taken at login. It is not refreshed when
/// assignments change; the principal must log in again (or the server must
/// run in live session mode) to observe new grants or revocations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject / principal identifier.
    pub sub: PrincipalId,

    pub display_name: String,

    pub login_name: String,

    /// Permission keys held at issuance.
    pub permissions: Vec<Permission>,

    /// Issued-at timestamp.
    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    pub issued_at: DateTime<Utc>,

    /// Absolute expiry; there is no sliding renewal.
    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
}

impl SessionClaims {
    /// Claims for a fresh session that lasts `ttl` from `now`.
    ///
    /// Timestamps are truncated to whole seconds, matching the wire format.
    pub fn new(
        sub: PrincipalId,
        display_name: impl Into<String>,
        login_name: impl Into<String>,
        permissions: Vec<Permission>,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        let issued_at = DateTime::from_timestamp(now.timestamp(), 0).unwrap_or(now);
        Self {
            sub,
            display_name: display_name.into(),
            login_name: login_name.into(),
            permissions,
            issued_at,
            expires_at: issued_at + ttl,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Deterministically validate the claim time window.
///
/// Signature verification happens in [`crate::token`]; this only checks times.
pub fn validate_claims(claims: &SessionClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}
