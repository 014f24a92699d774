//! `munadmin-core` — shared building blocks for the MUN admin back office.
//!
//! Pure types only: identifiers and the domain error model.

pub mod error;
pub mod id;

pub use error::DomainError;
pub use id::{PrincipalId, RecordId};
