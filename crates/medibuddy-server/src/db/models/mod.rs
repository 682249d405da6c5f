//! Database models for the MediBuddy server.
//!
//! This module contains SQLx-compatible model definitions
//! for all database tables, plus the request/response shapes
//! built from them.

pub mod health_record;
pub mod image;
pub mod user;

pub use health_record::*;
pub use image::*;
pub use user::*;
