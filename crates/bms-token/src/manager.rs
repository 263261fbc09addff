//! Bearer token manager.

use bms_model::Principal;
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};

use crate::claims::BearerClaims;
use crate::error::{TokenError, TokenResult};

/// Symmetric signing secret for HS256 tokens.
///
/// The secret must come from deployment configuration. There is no
/// default; minimum strength is enforced when the configuration is
/// validated.
#[derive(Clone)]
pub struct SigningSecret {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningSecret")
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .finish()
    }
}

impl SigningSecret {
    /// Creates a signing secret from raw bytes.
    #[must_use]
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }
}

/// Issues and validates HS256 bearer tokens.
#[derive(Debug)]
pub struct TokenManager {
    secret: SigningSecret,
    issuer: String,
    lifetime_seconds: i64,
}

impl TokenManager {
    /// Creates a new token manager.
    #[must_use]
    pub fn new(secret: SigningSecret, issuer: impl Into<String>, lifetime_seconds: i64) -> Self {
        Self {
            secret,
            issuer: issuer.into(),
            lifetime_seconds,
        }
    }

    /// Issues a signed token for a principal.
    ///
    /// # Errors
    ///
    /// Returns an error if token signing fails.
    pub fn issue(&self, principal: &Principal) -> TokenResult<String> {
        let expires_at = Utc::now() + Duration::seconds(self.lifetime_seconds);
        let claims = BearerClaims::new(
            self.issuer.clone(),
            principal.id,
            principal.identifier.clone(),
            principal.role,
            expires_at,
        );

        let header = Header::new(Algorithm::HS256);
        encode(&header, &claims, &self.secret.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Validates a token and returns its claims.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Expired`] for a well-formed token past its
    /// expiry, and [`TokenError::Invalid`] for every other rejection.
    pub fn verify(&self, token: &str) -> TokenResult<BearerClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.validate_exp = true;

        let token_data =
            decode::<BearerClaims>(token, &self.secret.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    _ => TokenError::Invalid,
                }
            })?;

        Ok(token_data.claims)
    }

    /// Returns the issuer name.
    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Returns the configured token lifetime in seconds.
    #[must_use]
    pub const fn lifetime_seconds(&self) -> i64 {
        self.lifetime_seconds
    }
}
