//! API-side authorization guard for endpoints.
//!
//! Handlers call these before touching persistent state; the store and the
//! services below it never see an unauthorized request.

use munadmin_auth::{authorize_all, AuthzError, CommandAuthorization, Permission};

use crate::context::PrincipalContext;

/// Check one permission for the current request.
pub fn require_permission(principal: &PrincipalContext, required: &Permission) -> Result<(), AuthzError> {
    munadmin_auth::authorize(principal.principal(), required).inspect_err(|_| {
        tracing::debug!(
            principal_id = %principal.principal_id(),
            required = %required,
            "endpoint access denied"
        );
    })
}

/// Check every permission a command declares.
///
/// This is intended to be called **before** performing the command.
pub fn authorize_command<C: CommandAuthorization>(
    principal: &PrincipalContext,
    command: &C,
) -> Result<(), AuthzError> {
    authorize_all(principal.principal(), command).inspect_err(|e| {
        tracing::debug!(principal_id = %principal.principal_id(), error = %e, "command denied");
    })
}
