//! Health record database model.
//!
//! A record's payload is stored as `jsonb`. On the way in it is parsed into
//! [`HealthPayload`]: a typed subset of the fields the application knows
//! about, plus an `extensions` map that keeps every other key verbatim.
//! Known fields distinguish a missing key (`None`) from an explicit `null`
//! (`Some(None)`), so both survive the round trip into storage.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Record type tag used for symptom questionnaires.
pub const HEALTH_CONCERNS_TYPE: &str = "health_concerns";

/// Row of the `health_data` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct HealthRecord {
    /// Record ID
    pub id: Uuid,

    /// Owner
    pub user_id: Uuid,

    /// Structured payload (JSON object)
    pub data: Value,
}

/// A known payload field: absent, `null`, or a string.
pub type PayloadField = Option<Option<String>>;

fn present<'de, D>(deserializer: D) -> Result<PayloadField, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Validated record payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthPayload {
    /// Record type, e.g. `health_concerns`
    #[serde(
        rename = "type",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: PayloadField,

    /// Source document name for extracted text
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub file_name: PayloadField,

    /// Text extracted from an uploaded document
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub extracted_text: PayloadField,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub symptoms: PayloadField,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub start_date: PayloadField,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub worsening_factors: PayloadField,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub previous_symptoms: PayloadField,

    /// Any other keys, kept as-is
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl HealthPayload {
    /// Reject payloads that carry no data at all.
    pub fn validate(&self) -> AppResult<()> {
        if self.to_object().is_empty() {
            return Err(AppError::Validation(
                "Health data must contain at least one field".to_string(),
            ));
        }
        Ok(())
    }

    /// The payload as the JSON object that gets stored.
    pub fn to_value(&self) -> AppResult<Value> {
        Ok(serde_json::to_value(self)?)
    }

    fn to_object(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

/// Default name for documents stored without one.
pub const UNKNOWN_FILE_NAME: &str = "Unknown";

/// Text extracted from an uploaded document (`POST /api/healthdata/store`).
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedDocument {
    pub file_name: String,
    pub extracted_text: String,
}

impl ExtractedDocument {
    /// Build from an arbitrary JSON object.
    ///
    /// `extracted_text` is used when it is a string; otherwise the whole
    /// input, re-serialized, becomes the text. `file_name` defaults to
    /// [`UNKNOWN_FILE_NAME`].
    pub fn from_input(input: &Map<String, Value>) -> AppResult<Self> {
        if input.is_empty() {
            return Err(AppError::Validation("No text data provided".to_string()));
        }

        let extracted_text = match input.get("extracted_text").and_then(Value::as_str) {
            Some(text) => text.to_string(),
            None => serde_json::to_string(input)?,
        };
        if extracted_text.trim().is_empty() {
            return Err(AppError::Validation("No text data provided".to_string()));
        }

        let file_name = input
            .get("file_name")
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_FILE_NAME)
            .to_string();

        Ok(Self {
            file_name,
            extracted_text,
        })
    }
}

impl From<ExtractedDocument> for HealthPayload {
    fn from(document: ExtractedDocument) -> Self {
        Self {
            file_name: Some(Some(document.file_name)),
            extracted_text: Some(Some(document.extracted_text)),
            ..Self::default()
        }
    }
}

/// `POST /api/health-concerns` body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthConcernsRequest {
    #[serde(default)]
    pub symptoms: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub worsening_factors: String,
    #[serde(default)]
    pub previous_symptoms: String,
}

impl From<HealthConcernsRequest> for HealthPayload {
    fn from(request: HealthConcernsRequest) -> Self {
        Self {
            kind: Some(Some(HEALTH_CONCERNS_TYPE.to_string())),
            symptoms: Some(Some(request.symptoms)),
            start_date: Some(Some(request.start_date)),
            worsening_factors: Some(Some(request.worsening_factors)),
            previous_symptoms: Some(Some(request.previous_symptoms)),
            ..Self::default()
        }
    }
}
