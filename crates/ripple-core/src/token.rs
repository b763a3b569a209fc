//! Signed session tokens (HS256 JWT). Purely functional over the
//! input; secret and ttl are explicit configuration, validated once at
//! startup.

use std::time::Duration;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the username.
    pub sub: String,
    pub exp: usize,
}

#[derive(Clone)]
pub struct TokenConfig {
    secret: String,
    ttl: Duration,
}

impl TokenConfig {
    /// Fails fast on an unusable secret or ttl so a misconfigured
    /// process never starts issuing tokens.
    pub fn new(secret: impl Into<String>, ttl: Duration) -> Result<Self, ServiceError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(ServiceError::Config("token secret must not be empty".into()));
        }
        if ttl.is_zero() {
            return Err(ServiceError::Config("token ttl must be positive".into()));
        }
        Ok(Self { secret, ttl })
    }

    pub fn issue(&self, username: &str) -> Result<String, ServiceError> {
        let ttl = chrono::Duration::from_std(self.ttl)
            .map_err(|e| ServiceError::Config(format!("token ttl out of range: {e}")))?;
        let claims = Claims {
            sub: username.to_string(),
            exp: (chrono::Utc::now() + ttl).timestamp() as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| ServiceError::Internal(format!("token encoding failed: {e}")))
    }

    /// Returns the subject username, or `TokenExpired` / `TokenInvalid`.
    pub fn validate(&self, token: &str) -> Result<String, ServiceError> {
        validate(token, &self.secret)
    }
}

pub fn validate(token: &str, secret: &str) -> Result<String, ServiceError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims.sub)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => ServiceError::TokenExpired,
        _ => ServiceError::TokenInvalid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TokenConfig {
        TokenConfig::new("test-secret", Duration::from_secs(3600)).unwrap()
    }

    #[test]
    fn rejects_bad_configuration() {
        assert!(matches!(
            TokenConfig::new("", Duration::from_secs(3600)),
            Err(ServiceError::Config(_))
        ));
        assert!(matches!(
            TokenConfig::new("secret", Duration::ZERO),
            Err(ServiceError::Config(_))
        ));
    }

    #[test]
    fn issued_token_round_trips() {
        let cfg = config();
        let token = cfg.issue("alice").unwrap();
        assert_eq!(cfg.validate(&token).unwrap(), "alice");
    }

    #[test]
    fn wrong_secret_is_invalid() {
        let token = config().issue("alice").unwrap();
        assert!(matches!(
            validate(&token, "other-secret"),
            Err(ServiceError::TokenInvalid)
        ));
    }

    #[test]
    fn garbage_is_invalid() {
        assert!(matches!(
            config().validate("not.a.jwt"),
            Err(ServiceError::TokenInvalid)
        ));
    }

    #[test]
    fn expired_token_is_distinguished() {
        // Forge a token whose expiry is well past the default leeway.
        let claims = Claims {
            sub: "alice".into(),
            exp: (chrono::Utc::now() - chrono::Duration::hours(2)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();
        assert!(matches!(
            config().validate(&token),
            Err(ServiceError::TokenExpired)
        ));
    }
}
