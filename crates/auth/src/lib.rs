//! `munadmin-auth` — pure authentication/authorization core.
//!
//! Decoupled from HTTP and storage: the API and infra crates feed it accounts,
//! tokens and permission keys, and it answers access questions.

pub mod account;
pub mod authorize;
pub mod catalog;
pub mod claims;
pub mod credentials;
pub mod password;
pub mod permissions;
pub mod principal;
pub mod routes;
pub mod token;

pub use account::{Account, AccountSummary, NewAccount};
pub use authorize::{authorize, authorize_all, authorized, AuthzError, CommandAuthorization};
pub use catalog::{Catalog, CatalogError};
pub use claims::{validate_claims, SessionClaims, TokenValidationError};
pub use credentials::{check_credentials, InvalidCredentials, LoginRejection};
pub use password::{PasswordError, PasswordHasher};
pub use permissions::{Permission, PermissionDef, PermissionKind, PermissionSet, FULL_ACCESS};
pub use principal::Principal;
pub use routes::{PageRoute, RoutePolicy, PAGE_ROUTES};
pub use token::{Hs256SessionTokens, SessionTokens, TokenError};

pub use munadmin_core::PrincipalId;
