use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::context::Identity;

/// JWT claims carried by an access token.
///
/// Decoded in a single step into this struct; anything that does not decode
/// cleanly is rejected. The owner-identifying claim is `user_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
}

impl Claims {
    pub fn new(owner_id: Uuid, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: Some(owner_id.to_string()),
            iss: Some("record-api".to_string()),
            aud: None,
            exp: Some((now + ttl).timestamp()),
            iat: Some(now.timestamp()),
            user_id: Some(owner_id),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,
    #[error("invalid bearer token")]
    InvalidToken,
    #[error("bearer token has expired")]
    ExpiredToken,
    #[error("token claims are missing a valid owner")]
    InvalidClaims,
    #[error("jwt secret is not configured")]
    MissingSecret,
}

/// Sign `claims` with `secret` (HS256).
///
/// There is no token issuance endpoint in this service; this helper exists
/// for tests and internal tooling that need a valid token.
pub fn issue(claims: &Claims, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    encode(&Header::default(), claims, &EncodingKey::from_secret(secret.as_bytes()))
}

/// HS256 access-token verifier.
///
/// A pure function over the header value and its configuration: no side
/// effects beyond a warning log for non-conformant headers.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
    scheme_prefix: String,
    leeway_seconds: i64,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenVerifier")
            .field("scheme_prefix", &self.scheme_prefix)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}

impl TokenVerifier {
    pub fn new(secret: &str, scheme: &str, leeway_seconds: u64) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::MissingSecret);
        }

        // Signature-only validation: expiry is checked manually below so
        // that tokens without an `exp` claim remain acceptable.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Ok(Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            scheme_prefix: format!("{} ", scheme),
            leeway_seconds: leeway_seconds as i64,
        })
    }

    /// Verify a raw header value and extract the caller's identity.
    ///
    /// Order: strip the scheme prefix, verify the signature, check expiry
    /// if present, then require a non-nil `user_id` claim.
    pub fn verify(&self, header: Option<&str>) -> Result<Identity, AuthError> {
        let header = header
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(AuthError::MissingToken)?;

        let token = match header.strip_prefix(&self.scheme_prefix) {
            Some(rest) => rest,
            None => {
                tracing::warn!("authorization header sent without the expected scheme prefix");
                header
            }
        };

        let decoded = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                _ => AuthError::InvalidToken,
            })?;
        let claims = decoded.claims;

        if let Some(exp) = claims.exp {
            if exp + self.leeway_seconds <= Utc::now().timestamp() {
                return Err(AuthError::ExpiredToken);
            }
        }

        let owner_id = claims
            .user_id
            .filter(|id| !id.is_nil())
            .ok_or(AuthError::InvalidClaims)?;

        Ok(Identity::new(owner_id))
    }
}
