//! User image database model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Row of the `user_images` table, including the image bytes.
#[derive(Clone, FromRow)]
pub struct UserImageEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub image_data: Vec<u8>,
    pub image_type: String,
    pub image_name: String,
    pub size: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Image metadata without the bytes.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ImageMeta {
    pub id: Uuid,
    pub user_id: Uuid,
    pub image_type: String,
    pub image_name: String,
    pub size: i64,
    pub created_at: DateTime<Utc>,
}

/// Response after an upload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageUploadResponse {
    pub message: String,
    pub image_id: Uuid,
    pub size: i64,
    pub name: String,
}

/// Query parameters for listing images.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageListQuery {
    /// 1-based page number
    #[serde(default = "default_page")]
    pub page: u32,

    /// Images per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    10
}

impl Default for ImageListQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

/// Response for listing images.
#[derive(Debug, Clone, Serialize)]
pub struct ImageListResponse {
    /// Images owned by the caller across all pages
    pub total: i64,
    pub page: u32,
    pub images: Vec<ImageMeta>,
}

/// Image bytes with the metadata needed to serve them.
#[derive(Debug, Clone)]
pub struct ImageContent {
    pub content_type: String,
    pub file_name: String,
    pub data: Vec<u8>,
}

impl From<UserImageEntry> for ImageContent {
    fn from(entry: UserImageEntry) -> Self {
        Self {
            content_type: entry.image_type,
            file_name: entry.image_name,
            data: entry.image_data,
        }
    }
}
