//! One-way credential hashing (bcrypt).

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Salted, slow password hasher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Lowest cost factor accepted; requested costs below it are raised.
    pub const MIN_COST: u32 = 10;

    pub fn new(cost: u32) -> Self {
        Self {
            cost: cost.clamp(Self::MIN_COST, 31),
        }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn hash(&self, raw_password: &str) -> Result<String, PasswordError> {
        bcrypt::hash(raw_password, self.cost).map_err(|e| PasswordError::Hash(e.to_string()))
    }

    /// Malformed stored hashes verify as `false`.
    pub fn verify(&self, raw_password: &str, credential_hash: &str) -> bool {
        bcrypt::verify(raw_password, credential_hash).unwrap_or(false)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(Self::MIN_COST)
    }
}
