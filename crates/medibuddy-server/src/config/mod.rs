//! Configuration module for the MediBuddy server.
//!
//! This module provides configuration loading from environment variables
//! using the `envy` crate for type-safe environment variable parsing.

mod app;
mod auth;
mod database;
mod upstream;

pub use app::AppConfig;
pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use upstream::UpstreamConfig;
