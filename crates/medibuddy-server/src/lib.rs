//! MediBuddy Server Library
//!
//! Backend for a personal health tracker:
//!
//! - **Accounts**: signup, login, profile and personal information
//! - **Health records**: free-form JSON records, always scoped to their owner
//! - **Images**: per-user photo storage
//! - **Chat**: questions answered from retrieved medical context plus the
//!   caller's own records
//!
//! ## Architecture
//!
//! Every protected route sits behind [`auth::require_identity`], which turns
//! a bearer token into an [`auth::Identity`]. Handlers pass that identity
//! explicitly to the services, and every query that touches user data is
//! filtered by it.
//!
//! ## Modules
//!
//! - [`auth`]: password hashing, tokens and the request gate
//! - [`chat`]: the retrieval / generation pipeline
//! - [`config`]: Configuration loading from environment variables
//! - [`db`]: Database connectivity, models and queries
//! - [`error`]: Custom error types with Axum integration
//! - [`handlers`]: HTTP route handlers
//! - [`routes`]: service wiring and router assembly
//! - [`services`]: account, health record and image logic
//!
//! ## Example
//!
//! ```ignore
//! use medibuddy_server::{
//!     config::{AppConfig, AuthConfig, DatabaseConfig, UpstreamConfig},
//!     db::create_pool,
//!     routes::{build_router, Services},
//!     state::AppState,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let app_config = AppConfig::from_env()?;
//!     let db_pool = create_pool(&DatabaseConfig::from_env()?).await?;
//!     let services = Services::build(
//!         db_pool.clone(),
//!         "secret",
//!         &AuthConfig::from_env()?,
//!         &UpstreamConfig::from_env()?,
//!     )?;
//!     let app = build_router(AppState::new(db_pool, app_config), services);
//!     // ... bind and serve
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod chat;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod result_ext;
pub mod routes;
pub mod services;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{AppError, AppResult};
pub use result_ext::ResultExt;
