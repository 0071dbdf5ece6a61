//! Stateless session tokens.
//!
//! Tokens are HS256-signed JWTs carrying the subject id, role and the
//! issued-at/expiry timestamps. There is no revocation store: a token is
//! valid until `exp`, full stop. Verification collapses bad signatures,
//! malformed structure and expiry into the single
//! [`AccountError::InvalidToken`] outcome so callers cannot distinguish
//! forgery from expiry.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::Principal;
use crate::domain::user::Role;
use crate::error::AccountError;

/// Claims embedded in every issued token.
///
/// Immutable once issued; destroyed implicitly at expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id the token was issued for.
    pub sub: Uuid,
    /// Role captured at issuance time.
    pub role: Role,
    /// Issued-at (Unix epoch seconds).
    pub iat: i64,
    /// Expiry (Unix epoch seconds).
    pub exp: i64,
}

/// Issues and verifies signed, time-bounded identity claims.
///
/// Holds the single signing key for the process; read-only after startup.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
    validation: Validation,
}

impl TokenService {
    /// Default token lifetime in seconds.
    pub const DEFAULT_TTL_SECS: i64 = 900;

    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact; no clock-skew grace window.
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
            validation,
        }
    }

    pub fn with_default_ttl(secret: &str) -> Self {
        Self::new(secret, Duration::seconds(Self::DEFAULT_TTL_SECS))
    }

    /// Seconds until a freshly issued token expires.
    pub fn ttl_secs(&self) -> i64 {
        self.ttl.num_seconds()
    }

    /// Sign claims for the given subject, valid from now until now + TTL.
    pub fn issue(
        &self,
        subject: Uuid,
        role: Role,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject,
            role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }

    /// Check signature and expiry, and decode the claims into a
    /// [`Principal`].
    ///
    /// All failure modes map to [`AccountError::InvalidToken`].
    pub fn verify(&self, token: &str) -> Result<Principal, AccountError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|_| AccountError::InvalidToken)?;

        Ok(Principal::new(data.claims.sub, data.claims.role))
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::with_default_ttl("test-signing-secret")
    }

    #[test]
    fn issued_tokens_verify_to_the_same_identity() {
        let tokens = service();
        let subject = Uuid::new_v4();

        let token = tokens.issue(subject, Role::Admin).expect("token issues");
        let principal = tokens.verify(&token).expect("token verifies");

        assert_eq!(principal.subject, subject);
        assert_eq!(principal.role, Role::Admin);
    }

    #[test]
    fn expired_token_is_invalid() {
        let tokens = service();
        let now = Utc::now();
        let claims = Claims {
            sub: Uuid::new_v4(),
            role: Role::User,
            iat: (now - Duration::seconds(1000)).timestamp(),
            exp: (now - Duration::seconds(100)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret("test-signing-secret".as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            tokens.verify(&token),
            Err(AccountError::InvalidToken)
        ));
    }

    #[test]
    fn foreign_signature_is_invalid() {
        let tokens = service();
        let other = TokenService::with_default_ttl("some-other-secret");

        let token = other.issue(Uuid::new_v4(), Role::User).unwrap();
        assert!(matches!(
            tokens.verify(&token),
            Err(AccountError::InvalidToken)
        ));
    }

    #[test]
    fn garbage_is_invalid() {
        let tokens = service();
        assert!(matches!(
            tokens.verify("not.a.jwt"),
            Err(AccountError::InvalidToken)
        ));
        assert!(matches!(tokens.verify(""), Err(AccountError::InvalidToken)));
    }
}
