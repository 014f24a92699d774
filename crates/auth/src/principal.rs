use serde::{Deserialize, Serialize};

use munadmin_core::PrincipalId;

use crate::claims::SessionClaims;
use crate::permissions::{Permission, PermissionSet};

/// A fully resolved principal for authorization decisions.
///
/// Built either from a session token snapshot or from a live store lookup;
/// the decision function does not care which.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub principal_id: PrincipalId,
    pub display_name: String,
    pub login_name: String,
    pub permissions: PermissionSet,
}

impl Principal {
    pub fn can(&self, required: &Permission) -> bool {
        crate::authorize::authorized(&self.permissions, required)
    }
}

impl From<SessionClaims> for Principal {
    fn from(claims: SessionClaims) -> Self {
        Self {
            principal_id: claims.sub,
            display_name: claims.display_name,
            login_name: claims.login_name,
            permissions: claims.permissions.into_iter().collect(),
        }
    }
}
