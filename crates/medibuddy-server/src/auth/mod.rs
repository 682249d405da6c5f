//! Authentication and authorization boundary.
//!
//! - [`password`]: Argon2id hashing and verification of credentials
//! - [`token`]: stateless HS256 token issuance and verification
//! - [`middleware`]: the gate that resolves an [`Identity`] for protected routes
//! - [`identity`]: the typed caller identity handed to every service call

pub mod identity;
pub mod middleware;
pub mod password;
pub mod token;

pub use identity::Identity;
pub use middleware::require_identity;
pub use password::PasswordHasher;
pub use token::{Claims, TokenIssuer};
