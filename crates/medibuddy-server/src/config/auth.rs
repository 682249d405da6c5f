//! Authentication configuration: token signing and password hashing cost.

use serde::Deserialize;
use std::fmt;
use std::time::Duration;

use crate::error::{AppError, AppResult};

const ENV_PREFIX: &str = "MEDIBUDDY_AUTH_";

/// Signing secret used only when running with `MEDIBUDDY_DEBUG=true`.
pub const DEV_JWT_SECRET: &str = "medibuddy-development-secret";

/// Authentication configuration loaded from environment variables.
///
/// Environment variables are prefixed with `MEDIBUDDY_AUTH_`:
/// - `MEDIBUDDY_AUTH_JWT_SECRET`: HMAC secret used to sign tokens
/// - `MEDIBUDDY_AUTH_TOKEN_TTL_HOURS`: Token lifetime (default: 72)
/// - `MEDIBUDDY_AUTH_HASH_MEMORY_KIB`: Argon2 memory cost (default: 19456)
/// - `MEDIBUDDY_AUTH_HASH_ITERATIONS`: Argon2 time cost (default: 2)
/// - `MEDIBUDDY_AUTH_HASH_PARALLELISM`: Argon2 lanes (default: 1)
#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    /// Token signing secret; required unless running in debug mode
    #[serde(default)]
    pub jwt_secret: Option<String>,

    /// Token lifetime in hours
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: u64,

    /// Argon2 memory cost in KiB
    #[serde(default = "default_hash_memory_kib")]
    pub hash_memory_kib: u32,

    /// Argon2 iterations
    #[serde(default = "default_hash_iterations")]
    pub hash_iterations: u32,

    /// Argon2 parallelism
    #[serde(default = "default_hash_parallelism")]
    pub hash_parallelism: u32,
}

fn default_token_ttl_hours() -> u64 {
    72
}

fn default_hash_memory_kib() -> u32 {
    19 * 1024
}

fn default_hash_iterations() -> u32 {
    2
}

fn default_hash_parallelism() -> u32 {
    1
}

impl AuthConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables are prefixed with `MEDIBUDDY_AUTH_`.
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed(ENV_PREFIX).from_env::<AuthConfig>()
    }

    /// Secret to sign and verify tokens with.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when no secret is set and `debug` is
    /// false. In debug mode the development secret is used instead.
    pub fn signing_secret(&self, debug: bool) -> AppResult<String> {
        match self.jwt_secret.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(secret) => Ok(secret.to_string()),
            None if debug => {
                tracing::warn!(
                    "MEDIBUDDY_AUTH_JWT_SECRET not set, using development secret (debug mode only)"
                );
                Ok(DEV_JWT_SECRET.to_string())
            }
            None => Err(AppError::Config(
                "MEDIBUDDY_AUTH_JWT_SECRET must be set outside debug mode".to_string(),
            )),
        }
    }

    /// Token lifetime as a `Duration`.
    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_hours * 3600)
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field("token_ttl_hours", &self.token_ttl_hours)
            .field("hash_memory_kib", &self.hash_memory_kib)
            .field("hash_iterations", &self.hash_iterations)
            .field("hash_parallelism", &self.hash_parallelism)
            .finish()
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_ttl_hours: default_token_ttl_hours(),
            hash_memory_kib: default_hash_memory_kib(),
            hash_iterations: default_hash_iterations(),
            hash_parallelism: default_hash_parallelism(),
        }
    }
}
