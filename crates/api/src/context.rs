use munadmin_auth::{Permission, Principal, PrincipalId};

/// Principal context for a request (authenticated identity + permissions).
///
/// Inserted into request extensions by the session and page guards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    principal: Principal,
}

impl PrincipalContext {
    pub fn new(principal: Principal) -> Self {
        Self { principal }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn principal_id(&self) -> PrincipalId {
        self.principal.principal_id
    }

    /// Held keys as a sorted slice-friendly vector.
    pub fn held(&self) -> Vec<Permission> {
        self.principal.permissions.to_vec()
    }
}
