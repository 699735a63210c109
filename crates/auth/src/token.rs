//! Stateless bearer tokens (HS256 JWT).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::{validate_claims, Identity, TokenClaims};

/// Lifetime of a freshly issued token, in minutes, unless configured otherwise.
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,

    #[error("token has no subject")]
    MissingSubject,

    #[error("token could not be encoded: {0}")]
    Encoding(String),
}

/// Mints bearer tokens for verified identities.
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, identity: &Identity, now: DateTime<Utc>) -> Result<String, TokenError>;
}

/// Verifies bearer tokens and yields the username they were issued to.
///
/// Verification is pure: no replay detection, no revocation list.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<String, TokenError>;
}

/// HS256 issuer/verifier sharing one process-wide secret.
#[derive(Clone)]
pub struct Hs256Tokens {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl Hs256Tokens {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self::with_ttl(secret, Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES))
    }

    pub fn with_ttl(secret: impl AsRef<[u8]>, ttl: Duration) -> Self {
        let secret = secret.as_ref();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn validation() -> Validation {
        // Time checks run in `validate_claims` against the caller's clock.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);
        validation
    }
}

impl core::fmt::Debug for Hs256Tokens {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hs256Tokens")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer for Hs256Tokens {
    fn issue(&self, identity: &Identity, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = TokenClaims::new(identity.username.clone(), now, self.ttl);
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }
}

impl TokenVerifier for Hs256Tokens {
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding, &Self::validation())
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            })?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;

    fn admin() -> Identity {
        Identity {
            username: "adminuser".to_string(),
            password_verifier: String::new(),
            role: Role::ReadWrite,
        }
    }

    fn forge(secret: &str, claims: &serde_json::Value, alg: Algorithm) -> String {
        jsonwebtoken::encode(&Header::new(alg), claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    #[test]
    fn issued_token_verifies_to_its_subject() {
        let tokens = Hs256Tokens::new("test-secret");
        let now = Utc::now();
        let token = tokens.issue(&admin(), now).unwrap();
        assert_eq!(tokens.verify(&token, now).unwrap(), "adminuser");
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let now = Utc::now();
        let token = Hs256Tokens::new("other-secret").issue(&admin(), now).unwrap();
        let err = Hs256Tokens::new("test-secret").verify(&token, now).unwrap_err();
        assert_eq!(err, TokenError::InvalidSignature);
    }

    #[test]
    fn expired_token_is_rejected() {
        let tokens = Hs256Tokens::with_ttl("test-secret", Duration::minutes(1));
        let issued = Utc::now();
        let token = tokens.issue(&admin(), issued).unwrap();
        let err = tokens.verify(&token, issued + Duration::minutes(2)).unwrap_err();
        assert_eq!(err, TokenError::Expired);
    }

    #[test]
    fn garbage_is_malformed() {
        let tokens = Hs256Tokens::new("test-secret");
        assert_eq!(tokens.verify("not.a.jwt", Utc::now()), Err(TokenError::Malformed));
        assert_eq!(tokens.verify("", Utc::now()), Err(TokenError::Malformed));
    }

    #[test]
    fn token_without_subject_is_rejected() {
        let now = Utc::now();
        let token = forge(
            "test-secret",
            &serde_json::json!({ "iat": now.timestamp(), "exp": now.timestamp() + 60 }),
            Algorithm::HS256,
        );
        let err = Hs256Tokens::new("test-secret").verify(&token, now).unwrap_err();
        assert_eq!(err, TokenError::MissingSubject);
    }

    #[test]
    fn token_without_expiry_is_rejected() {
        let now = Utc::now();
        let token = forge(
            "test-secret",
            &serde_json::json!({ "sub": "adminuser", "iat": now.timestamp() }),
            Algorithm::HS256,
        );
        let err = Hs256Tokens::new("test-secret").verify(&token, now).unwrap_err();
        assert_eq!(err, TokenError::Malformed);
    }

    #[test]
    fn other_algorithms_are_rejected() {
        let now = Utc::now();
        let token = forge(
            "test-secret",
            &serde_json::json!({ "sub": "adminuser", "iat": now.timestamp(), "exp": now.timestamp() + 60 }),
            Algorithm::HS512,
        );
        assert!(Hs256Tokens::new("test-secret").verify(&token, now).is_err());
    }
}
