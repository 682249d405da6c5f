//! Image API handlers.

use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::{PathRejection, QueryRejection},
        Multipart, Path, Query, State,
    },
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
        HeaderValue, StatusCode,
    },
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use super::MessageResponse;
use crate::auth::Identity;
use crate::db::models::{ImageListQuery, ImageListResponse, ImageUploadResponse};
use crate::error::{AppError, AppResult};
use crate::services::{ImageService, ImageUpload};

/// Multipart field carrying the file.
const IMAGE_FIELD: &str = "image";

/// Upload an image.
///
/// `POST /api/images/upload` (multipart, field `image`)
///
/// # Response
///
/// ```json
/// {"message": "Image uploaded successfully", "imageId": "...", "size": 5120, "name": "scan.png"}
/// ```
pub async fn upload(
    State(service): State<ImageService>,
    identity: Identity,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<(StatusCode, Json<ImageUploadResponse>)> {
    let mut multipart = multipart
        .map_err(|e| AppError::Validation(format!("Failed to parse form: {}", e.body_text())))?;

    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await?.to_vec();
        upload = Some(ImageUpload {
            file_name,
            content_type,
            data,
        });
        break;
    }

    let upload =
        upload.ok_or_else(|| AppError::Validation("No image file provided".to_string()))?;
    let response = service.upload(&identity, upload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// `GET /api/images?page=1&pageSize=10`
pub async fn list(
    State(service): State<ImageService>,
    identity: Identity,
    query: Result<Query<ImageListQuery>, QueryRejection>,
) -> AppResult<Json<ImageListResponse>> {
    let Query(query) =
        query.map_err(|e| AppError::Validation(format!("Invalid query: {}", e.body_text())))?;
    Ok(Json(service.list(&identity, query).await?))
}

/// Serve an image's bytes.
///
/// `GET /api/images/{id}`
pub async fn get(
    State(service): State<ImageService>,
    identity: Identity,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(id) = id.map_err(|_| AppError::Validation("Invalid image ID format".to_string()))?;
    let image = service.get(&identity, id).await?;

    let content_type = HeaderValue::from_str(&image.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    let disposition = HeaderValue::from_str(&format!(
        "inline; filename=\"{}\"",
        image.file_name.replace('"', "")
    ))
    .unwrap_or_else(|_| HeaderValue::from_static("inline"));

    Ok((
        [(CONTENT_TYPE, content_type), (CONTENT_DISPOSITION, disposition)],
        image.data,
    ))
}

/// `DELETE /api/images/{id}`
pub async fn delete(
    State(service): State<ImageService>,
    identity: Identity,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<MessageResponse>> {
    let Path(id) = id.map_err(|_| AppError::Validation("Invalid image ID format".to_string()))?;
    service.delete(&identity, id).await?;
    Ok(Json(MessageResponse::new("Image deleted successfully")))
}
