//! Image service: per-user photo storage.

use uuid::Uuid;

use crate::auth::Identity;
use crate::db::models::{ImageContent, ImageListQuery, ImageListResponse, ImageUploadResponse};
use crate::db::queries::image as queries;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};

/// Largest accepted upload.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Accepted file extensions, lowercase.
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

const MAX_PAGE_SIZE: u32 = 100;

/// An uploaded file as read from the multipart body.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// Service for image operations.
#[derive(Clone)]
pub struct ImageService {
    pool: DbPool,
}

impl ImageService {
    /// Create a new image service.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Validate and store an upload.
    pub async fn upload(
        &self,
        identity: &Identity,
        upload: ImageUpload,
    ) -> AppResult<ImageUploadResponse> {
        let content_type = validate_upload(&upload)?;

        let meta = queries::insert_image(
            &self.pool,
            identity.user_id(),
            &upload.data,
            &content_type,
            &upload.file_name,
        )
        .await?;

        tracing::info!(
            user_id = %identity,
            image_id = %meta.id,
            size = meta.size,
            "Image uploaded"
        );

        Ok(ImageUploadResponse {
            message: "Image uploaded successfully".to_string(),
            image_id: meta.id,
            size: meta.size,
            name: meta.image_name,
        })
    }

    /// List the caller's images, newest first, without their bytes.
    pub async fn list(
        &self,
        identity: &Identity,
        query: ImageListQuery,
    ) -> AppResult<ImageListResponse> {
        let page = query.page.max(1);
        let page_size = query.page_size.clamp(1, MAX_PAGE_SIZE);
        let offset = i64::from(page - 1) * i64::from(page_size);

        let total = queries::count_images_by_owner(&self.pool, identity.user_id()).await?;
        let images = queries::list_images_by_owner(
            &self.pool,
            identity.user_id(),
            i64::from(page_size),
            offset,
        )
        .await?;

        Ok(ImageListResponse {
            total,
            page,
            images,
        })
    }

    /// Fetch one of the caller's images.
    pub async fn get(&self, identity: &Identity, id: Uuid) -> AppResult<ImageContent> {
        queries::get_owned_image(&self.pool, id, identity.user_id())
            .await?
            .map(ImageContent::from)
            .ok_or_else(|| AppError::NotFound("Image not found".to_string()))
    }

    /// Delete one of the caller's images.
    pub async fn delete(&self, identity: &Identity, id: Uuid) -> AppResult<()> {
        let removed = queries::delete_owned_image(&self.pool, id, identity.user_id()).await?;
        if removed == 0 {
            return Err(AppError::NotFound(
                "Image not found or already deleted".to_string(),
            ));
        }

        tracing::info!(user_id = %identity, image_id = %id, "Image deleted");
        Ok(())
    }
}

/// Lowercase extension of `file_name`, if any.
fn extension(file_name: &str) -> Option<String> {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

fn mime_for_extension(ext: &str) -> &'static str {
    match ext {
        "png" => "image/png",
        "gif" => "image/gif",
        _ => "image/jpeg",
    }
}

/// Check extension, size and emptiness; returns the MIME type to store.
fn validate_upload(upload: &ImageUpload) -> AppResult<String> {
    let ext = extension(&upload.file_name)
        .filter(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
        .ok_or_else(|| {
            AppError::Validation(
                "Invalid image format. Supported formats: jpg, jpeg, png, gif".to_string(),
            )
        })?;

    if upload.data.is_empty() {
        return Err(AppError::Validation("Image file is empty".to_string()));
    }
    if upload.data.len() > MAX_IMAGE_BYTES {
        return Err(AppError::Validation(format!(
            "Image exceeds the {} MiB limit",
            MAX_IMAGE_BYTES / (1024 * 1024)
        )));
    }

    let content_type = upload
        .content_type
        .as_deref()
        .filter(|ct| ct.starts_with("image/"))
        .unwrap_or_else(|| mime_for_extension(&ext));
    Ok(content_type.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(file_name: &str, content_type: Option<&str>, len: usize) -> ImageUpload {
        ImageUpload {
            file_name: file_name.to_string(),
            content_type: content_type.map(str::to_string),
            data: vec![0u8; len],
        }
    }

    #[test]
    fn test_allowed_extensions_are_case_insensitive() {
        assert_eq!(
            validate_upload(&upload("scan.PNG", Some("image/png"), 16)).unwrap(),
            "image/png"
        );
        assert!(validate_upload(&upload("photo.jpeg", None, 16)).is_ok());
    }

    #[test]
    fn test_disallowed_extension_rejected() {
        for name in ["report.pdf", "noext", "image.png.exe"] {
            assert!(matches!(
                validate_upload(&upload(name, Some("image/png"), 16)),
                Err(AppError::Validation(_))
            ));
        }
    }

    #[test]
    fn test_oversized_upload_rejected() {
        let result = validate_upload(&upload("big.gif", None, MAX_IMAGE_BYTES + 1));
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(validate_upload(&upload("max.gif", None, MAX_IMAGE_BYTES)).is_ok());
    }

    #[test]
    fn test_empty_upload_rejected() {
        assert!(matches!(
            validate_upload(&upload("empty.jpg", None, 0)),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_content_type_falls_back_to_extension() {
        assert_eq!(
            validate_upload(&upload("a.gif", Some("application/octet-stream"), 1)).unwrap(),
            "image/gif"
        );
        assert_eq!(validate_upload(&upload("a.jpg", None, 1)).unwrap(), "image/jpeg");
    }
}
