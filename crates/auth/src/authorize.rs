use thiserror::Error;

use crate::permissions::{Permission, FULL_ACCESS};
use crate::principal::Principal;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    /// The missing key is kept for server-side logs; never render it to clients.
    #[error("forbidden: missing permission '{0}'")]
    Forbidden(Permission),
}

/// Command-side authorization contract (checked at the endpoint boundary).
///
/// Implement this on operations that require permissions. Handlers enforce
/// these requirements before touching persistent state.
pub trait CommandAuthorization {
    fn required_permissions(&self) -> &[Permission];
}

/// The decision function.
///
/// `full_access` satisfies every requirement, including keys outside the
/// catalog. Otherwise the exact key must be held: no prefixes, no wildcards,
/// no hierarchy.
///
/// - No IO
/// - No panics
pub fn authorized<'a>(held: impl IntoIterator<Item = &'a Permission>, required: &Permission) -> bool {
    held.into_iter().any(|p| p == &FULL_ACCESS || p == required)
}

/// Authorize a resolved principal.
pub fn authorize(principal: &Principal, required: &Permission) -> Result<(), AuthzError> {
    if principal.can(required) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(required.clone()))
    }
}

/// Authorize every permission a command declares.
pub fn authorize_all<C: CommandAuthorization + ?Sized>(
    principal: &Principal,
    command: &C,
) -> Result<(), AuthzError> {
    for perm in command.required_permissions() {
        authorize(principal, perm)?;
    }
    Ok(())
}
