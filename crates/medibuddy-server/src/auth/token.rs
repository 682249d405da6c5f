//! Stateless signed tokens.
//!
//! Tokens are HS256 JWTs carrying `{sub, iat, exp}`. Nothing is stored
//! server-side: any issuer built from the same secret accepts the same
//! tokens, and a token stays valid until `exp` (there is no revocation list).

use chrono::{DateTime, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use super::identity::Identity;
use crate::error::{AppError, AppResult};

/// Claims embedded in every token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// User id
    pub sub: String,

    /// Issued-at (seconds since epoch)
    pub iat: i64,

    /// Expiry (seconds since epoch)
    pub exp: i64,
}

/// Issues and verifies tokens with a shared symmetric secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl TokenIssuer {
    /// Create an issuer.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the secret is empty or the lifetime
    /// is zero.
    pub fn new(secret: &[u8], ttl: Duration) -> AppResult<Self> {
        if secret.is_empty() {
            return Err(AppError::Config("Token secret must not be empty".to_string()));
        }
        let ttl_secs = i64::try_from(ttl.as_secs())
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or_else(|| AppError::Config(format!("Invalid token lifetime: {:?}", ttl)))?;

        // Expiry is checked by hand so that `now == exp` already counts as expired.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl_secs,
        })
    }

    /// Issue a token for `user_id`, valid from now for the configured lifetime.
    pub fn issue(&self, user_id: Uuid) -> AppResult<String> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(&self, user_id: Uuid, now: DateTime<Utc>) -> AppResult<String> {
        let iat = now.timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            iat,
            exp: iat + self.ttl_secs,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Verify a token and resolve the identity it is bound to.
    pub fn verify(&self, token: &str) -> AppResult<Identity> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as if the current time were `now`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Auth`] when the signature does not match, the
    /// payload is malformed, the subject is not a user id, or `now` is at or
    /// past the expiry.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> AppResult<Identity> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => AppError::Auth("Invalid token signature".to_string()),
                _ => AppError::Auth("Malformed token".to_string()),
            }
        })?;
        let claims = data.claims;

        if now.timestamp() >= claims.exp {
            return Err(AppError::Auth("Token expired".to_string()));
        }

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Auth("Invalid token subject".to_string()))?;

        Ok(Identity::new(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use chrono::TimeZone;

    const SECRET: &[u8] = b"test-signing-secret";

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(SECRET, Duration::from_secs(3600)).unwrap()
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn auth_reason(result: AppResult<Identity>) -> String {
        match result {
            Err(AppError::Auth(reason)) => reason,
            other => panic!("expected auth error, got {:?}", other),
        }
    }

    #[test]
    fn test_issue_then_verify_returns_subject() {
        let user_id = Uuid::new_v4();
        let token = issuer().issue(user_id).unwrap();
        let identity = issuer().verify(&token).unwrap();
        assert_eq!(identity.user_id(), user_id);
    }

    #[test]
    fn test_independent_issuers_share_secret() {
        let user_id = Uuid::new_v4();
        let token = issuer().issue_at(user_id, at(1_700_000_000)).unwrap();
        let other = TokenIssuer::new(SECRET, Duration::from_secs(60)).unwrap();
        let identity = other.verify_at(&token, at(1_700_000_100)).unwrap();
        assert_eq!(identity.user_id(), user_id);
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = issuer().issue_at(Uuid::new_v4(), at(1_700_000_000)).unwrap();
        let reason = auth_reason(issuer().verify_at(&token, at(1_700_003_601)));
        assert_eq!(reason, "Token expired");
    }

    #[test]
    fn test_token_expires_exactly_at_exp() {
        let token = issuer().issue_at(Uuid::new_v4(), at(1_700_000_000)).unwrap();
        assert!(issuer().verify_at(&token, at(1_700_003_599)).is_ok());
        assert!(issuer().verify_at(&token, at(1_700_003_600)).is_err());
    }

    #[test]
    fn test_signature_bit_flip_rejected() {
        let token = issuer().issue(Uuid::new_v4()).unwrap();
        let (head, signature) = token.rsplit_once('.').unwrap();

        let mut bytes = URL_SAFE_NO_PAD.decode(signature).unwrap();
        bytes[0] ^= 0x01;
        let tampered = format!("{}.{}", head, URL_SAFE_NO_PAD.encode(&bytes));

        let reason = auth_reason(issuer().verify(&tampered));
        assert_eq!(reason, "Invalid token signature");
    }

    #[test]
    fn test_other_secret_rejected() {
        let token = issuer().issue(Uuid::new_v4()).unwrap();
        let other = TokenIssuer::new(b"another-secret", Duration::from_secs(3600)).unwrap();
        assert!(matches!(other.verify(&token), Err(AppError::Auth(_))));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let reason = auth_reason(issuer().verify("not.a.jwt"));
        assert_eq!(reason, "Malformed token");
    }

    #[test]
    fn test_non_uuid_subject_rejected() {
        let claims = Claims {
            sub: "42".to_string(),
            iat: Utc::now().timestamp(),
            exp: Utc::now().timestamp() + 600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        let reason = auth_reason(issuer().verify(&token));
        assert_eq!(reason, "Invalid token subject");
    }

    #[test]
    fn test_empty_secret_is_config_error() {
        let result = TokenIssuer::new(b"", Duration::from_secs(60));
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
