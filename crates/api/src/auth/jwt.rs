//! Session-token validation.
//!
//! Tokens are minted by the identity provider; this service only verifies
//! them. Deployments configure either an HS256 shared secret or the
//! provider's RS256 public key (PEM). The `sub` claim carries the external
//! identity that is mapped to an owner.

use std::fmt;

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Claims read from a session token. Provider-specific extras are ignored.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the external identity id.
    pub sub: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Issuer, checked when [`JwtConfig::issuer`] is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

/// Configuration for session-token validation.
#[derive(Clone)]
pub struct JwtConfig {
    pub algorithm: Algorithm,
    pub decoding_key: DecodingKey,
    /// Required `iss` value, if any.
    pub issuer: Option<String>,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("algorithm", &self.algorithm)
            .field("issuer", &self.issuer)
            .finish_non_exhaustive()
    }
}

impl JwtConfig {
    /// HS256 validation with a shared secret.
    pub fn hs256(secret: &str, issuer: Option<String>) -> Self {
        Self {
            algorithm: Algorithm::HS256,
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
        }
    }

    /// RS256 validation with a PEM-encoded public key.
    pub fn rs256(public_key_pem: &str, issuer: Option<String>) -> Result<Self, jsonwebtoken::errors::Error> {
        Ok(Self {
            algorithm: Algorithm::RS256,
            decoding_key: DecodingKey::from_rsa_pem(public_key_pem.as_bytes())?,
            issuer,
        })
    }

    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var               | Required              | Default |
    /// |-----------------------|-----------------------|---------|
    /// | `AUTH_JWT_PUBLIC_KEY` | one of the two        | --      |
    /// | `AUTH_JWT_SECRET`     | one of the two        | --      |
    /// | `AUTH_JWT_ISSUER`     | no                    | unset   |
    ///
    /// The public key wins when both are set.
    ///
    /// # Panics
    ///
    /// Panics if neither key is set, the secret is empty, or the PEM does not
    /// parse.
    pub fn from_env() -> Self {
        let issuer = std::env::var("AUTH_JWT_ISSUER")
            .ok()
            .filter(|s| !s.trim().is_empty());

        if let Ok(pem) = std::env::var("AUTH_JWT_PUBLIC_KEY") {
            return Self::rs256(&pem, issuer).expect("AUTH_JWT_PUBLIC_KEY must be a valid RSA PEM");
        }

        let secret = std::env::var("AUTH_JWT_SECRET")
            .expect("AUTH_JWT_SECRET or AUTH_JWT_PUBLIC_KEY must be set in the environment");
        assert!(!secret.is_empty(), "AUTH_JWT_SECRET must not be empty");
        Self::hs256(&secret, issuer)
    }
}

/// Validate and decode a session token, returning the embedded [`Claims`].
///
/// Validates the signature, expiration and (when configured) the issuer.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(config.algorithm);
    if let Some(issuer) = &config.issuer {
        validation.set_issuer(&[issuer]);
    }
    let token_data = decode::<Claims>(token, &config.decoding_key, &validation)?;
    Ok(token_data.claims)
}
