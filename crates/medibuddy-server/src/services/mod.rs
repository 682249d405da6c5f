//! Service layer for the MediBuddy server.
//!
//! Services encapsulate business logic and coordinate
//! between handlers and database queries.

pub mod account;
pub mod health_record;
pub mod image;

pub use account::{AccountService, PgUserStore, UserStore};
pub use health_record::{HealthRecordService, HealthRecordStore, PgHealthRecordStore};
pub use image::{ImageService, ImageUpload};
