//! One-way salted password hashing.
//!
//! Digests are PHC strings (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`), so
//! the salt and work factor travel with the digest and verification needs no
//! other input.

use argon2::password_hash::{
    rand_core::OsRng, Error as PhcError, PasswordHash, PasswordHasher as _, PasswordVerifier,
    SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::config::AuthConfig;
use crate::error::{AppError, AppResult};

/// Argon2id hasher with a configurable work factor.
#[derive(Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// Create a hasher with explicit cost parameters.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if Argon2 rejects the parameters
    /// (for example a memory cost below `8 * parallelism`).
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> AppResult<Self> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| AppError::Config(format!("Invalid password hashing parameters: {}", e)))?;
        Ok(Self { params })
    }

    /// Create a hasher from the auth configuration.
    pub fn from_config(config: &AuthConfig) -> AppResult<Self> {
        Self::new(
            config.hash_memory_kib,
            config.hash_iterations,
            config.hash_parallelism,
        )
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a password with a fresh random salt.
    pub fn hash(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|digest| digest.to_string())
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
    }

    /// Check a password against a stored digest.
    ///
    /// The cost parameters embedded in `digest` are used, not the ones this
    /// hasher was built with, so digests survive a change of work factor.
    ///
    /// # Returns
    ///
    /// `Ok(false)` on mismatch; an error only if `digest` is not a valid PHC
    /// string.
    pub fn verify(&self, password: &str, digest: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(digest)
            .map_err(|e| AppError::Internal(format!("Malformed password digest: {}", e)))?;

        match self.argon2().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(PhcError::Password) => Ok(false),
            Err(e) => Err(AppError::Internal(format!(
                "Password verification failed: {}",
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_hasher() -> PasswordHasher {
        PasswordHasher::new(1024, 1, 1).unwrap()
    }

    #[test]
    fn test_hash_then_verify() {
        let hasher = fast_hasher();
        let digest = hasher.hash("correct horse battery staple").unwrap();
        assert!(digest.starts_with("$argon2id$"));
        assert!(hasher.verify("correct horse battery staple", &digest).unwrap());
    }

    #[test]
    fn test_wrong_password_is_false_not_error() {
        let hasher = fast_hasher();
        let digest = hasher.hash("hunter22").unwrap();
        assert!(!hasher.verify("hunter23", &digest).unwrap());
    }

    #[test]
    fn test_same_password_yields_distinct_digests() {
        let hasher = fast_hasher();
        let first = hasher.hash("same-password").unwrap();
        let second = hasher.hash("same-password").unwrap();
        assert_ne!(first, second);
        assert!(hasher.verify("same-password", &first).unwrap());
        assert!(hasher.verify("same-password", &second).unwrap());
    }

    #[test]
    fn test_verify_uses_params_embedded_in_digest() {
        let digest = PasswordHasher::new(2048, 2, 1).unwrap().hash("pw123456").unwrap();
        assert!(fast_hasher().verify("pw123456", &digest).unwrap());
    }

    #[test]
    fn test_malformed_digest_is_error() {
        let hasher = fast_hasher();
        assert!(hasher.verify("whatever", "not-a-phc-string").is_err());
    }

    #[test]
    fn test_invalid_params_rejected() {
        let result = PasswordHasher::new(1, 1, 4);
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
