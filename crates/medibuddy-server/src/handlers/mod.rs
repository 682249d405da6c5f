//! HTTP handlers for the MediBuddy API, organized by domain.

use serde::Serialize;

pub mod account;
pub mod chat;
pub mod health;
pub mod health_records;
pub mod images;

pub use health::{api_health, health_check};

/// `{"message": "..."}` body used by endpoints with nothing else to return.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
