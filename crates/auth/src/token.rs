//! Signed session tokens (HS256 JWT).

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::claims::{validate_claims, SessionClaims, TokenValidationError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token could not be signed: {0}")]
    Encode(String),

    #[error("token is malformed or its signature is invalid")]
    Invalid,

    #[error(transparent)]
    Claims(#[from] TokenValidationError),
}

/// Issues and verifies session tokens.
pub trait SessionTokens: Send + Sync {
    fn issue(&self, claims: &SessionClaims) -> Result<String, TokenError>;

    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, TokenError>;
}

/// HMAC-SHA256 signed JWTs with a shared secret.
pub struct Hs256SessionTokens {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Hs256SessionTokens {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let secret = secret.as_ref();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

impl core::fmt::Debug for Hs256SessionTokens {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hs256SessionTokens").finish_non_exhaustive()
    }
}

impl SessionTokens for Hs256SessionTokens {
    fn issue(&self, claims: &SessionClaims) -> Result<String, TokenError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| TokenError::Encode(e.to_string()))
    }

    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, TokenError> {
        // Expiry is judged against the caller's clock below, not the library's.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;

        let data = jsonwebtoken::decode::<SessionClaims>(token, &self.decoding, &validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "session token rejected");
                TokenError::Invalid
            })?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}
