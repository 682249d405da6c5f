//! Database queries for the MediBuddy server.
//!
//! This module contains database query functions organized by domain.

pub mod health_record;
pub mod image;
pub mod user;
