//! Database module for the MediBuddy server.
//!
//! This module provides database connectivity, models, and queries
//! for PostgreSQL using SQLx. Tables (`users`, `health_data`,
//! `user_images`) are expected to exist already.

pub mod models;
pub mod pool;
pub mod queries;

pub use pool::{create_lazy_pool, create_pool, DbPool};
