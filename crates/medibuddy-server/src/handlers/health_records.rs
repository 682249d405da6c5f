//! Health record API handlers.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use super::MessageResponse;
use crate::auth::Identity;
use crate::db::models::{HealthConcernsRequest, HealthPayload, HealthRecord};
use crate::error::{AppError, AppResult};
use crate::services::HealthRecordService;

/// Response after storing a derived record.
#[derive(Debug, Serialize)]
pub struct StoredRecordResponse {
    pub message: String,
    pub id: Uuid,
}

/// Add a health record.
///
/// `POST /api/healthdata`
///
/// # Request Body
///
/// Any non-empty JSON object:
///
/// ```json
/// {"cholesterol": 210, "measured_at": "2024-03-01"}
/// ```
///
/// # Response
///
/// `201 Created` with `{"id": "...", "user_id": "...", "data": {...}}`
pub async fn add(
    State(service): State<HealthRecordService>,
    identity: Identity,
    payload: Result<Json<HealthPayload>, JsonRejection>,
) -> AppResult<(StatusCode, Json<HealthRecord>)> {
    let Json(payload) = payload?;
    let record = service.add(&identity, payload).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// `GET /api/healthdata`
pub async fn list(
    State(service): State<HealthRecordService>,
    identity: Identity,
) -> AppResult<Json<Vec<HealthRecord>>> {
    Ok(Json(service.list(&identity).await?))
}

/// `DELETE /api/healthdata/{id}`
///
/// `404` when the record does not exist or belongs to someone else.
pub async fn delete(
    State(service): State<HealthRecordService>,
    identity: Identity,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<MessageResponse>> {
    let Path(id) = id.map_err(|_| AppError::Validation("Invalid data ID format".to_string()))?;
    service.delete(&identity, id).await?;
    Ok(Json(MessageResponse::new("Health data deleted")))
}

/// Store text extracted from an uploaded document.
///
/// `POST /api/healthdata/store`
///
/// # Request Body
///
/// ```json
/// {"file_name": "labs.pdf", "extracted_text": "LDL 130 mg/dL"}
/// ```
///
/// Without `extracted_text`, the whole body is stored as text.
pub async fn store_extracted(
    State(service): State<HealthRecordService>,
    identity: Identity,
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> AppResult<Json<StoredRecordResponse>> {
    let Json(input) = payload?;
    let record = service.store_extracted(&identity, &input).await?;
    Ok(Json(StoredRecordResponse {
        message: "Data stored successfully".to_string(),
        id: record.id,
    }))
}

/// Store a health concerns questionnaire.
///
/// `POST /api/health-concerns`
///
/// # Request Body
///
/// ```json
/// {
///   "symptoms": "headache",
///   "startDate": "2024-01-02",
///   "worseningFactors": "screens",
///   "previousSymptoms": "none"
/// }
/// ```
pub async fn store_concerns(
    State(service): State<HealthRecordService>,
    identity: Identity,
    payload: Result<Json<HealthConcernsRequest>, JsonRejection>,
) -> AppResult<Json<StoredRecordResponse>> {
    let Json(request) = payload?;
    let record = service.store_concerns(&identity, request).await?;
    Ok(Json(StoredRecordResponse {
        message: "Health concerns data stored successfully".to_string(),
        id: record.id,
    }))
}
