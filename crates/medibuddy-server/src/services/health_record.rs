//! Health record service.
//!
//! Records are reached only through [`HealthRecordStore`], whose every method
//! takes the owning user id, so a caller can never read or delete another
//! user's data.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::Identity;
use crate::db::models::{ExtractedDocument, HealthConcernsRequest, HealthPayload, HealthRecord};
use crate::db::queries::health_record as queries;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};

/// Owner-scoped persistence of health records.
#[async_trait]
pub trait HealthRecordStore: Send + Sync {
    /// Store `data` for `owner`.
    async fn insert(&self, owner: Uuid, data: &Value) -> AppResult<HealthRecord>;

    /// All records belonging to `owner`.
    async fn list_by_owner(&self, owner: Uuid) -> AppResult<Vec<HealthRecord>>;

    /// Delete `id` if `owner` owns it; returns the number of rows removed.
    async fn delete_owned(&self, id: Uuid, owner: Uuid) -> AppResult<u64>;
}

/// PostgreSQL-backed store over the `health_data` table.
#[derive(Clone)]
pub struct PgHealthRecordStore {
    pool: DbPool,
}

impl PgHealthRecordStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthRecordStore for PgHealthRecordStore {
    async fn insert(&self, owner: Uuid, data: &Value) -> AppResult<HealthRecord> {
        queries::insert_health_record(&self.pool, owner, data).await
    }

    async fn list_by_owner(&self, owner: Uuid) -> AppResult<Vec<HealthRecord>> {
        queries::list_health_records_by_owner(&self.pool, owner).await
    }

    async fn delete_owned(&self, id: Uuid, owner: Uuid) -> AppResult<u64> {
        queries::delete_owned_health_record(&self.pool, id, owner).await
    }
}

/// Service for health record operations.
#[derive(Clone)]
pub struct HealthRecordService {
    store: Arc<dyn HealthRecordStore>,
}

impl HealthRecordService {
    /// Create a new health record service.
    pub fn new(store: Arc<dyn HealthRecordStore>) -> Self {
        Self { store }
    }

    /// Add a record for the caller.
    pub async fn add(&self, identity: &Identity, payload: HealthPayload) -> AppResult<HealthRecord> {
        payload.validate()?;
        let record = self
            .store
            .insert(identity.user_id(), &payload.to_value()?)
            .await?;

        tracing::info!(user_id = %identity, record_id = %record.id, "Health record added");
        Ok(record)
    }

    /// All of the caller's records.
    pub async fn list(&self, identity: &Identity) -> AppResult<Vec<HealthRecord>> {
        self.store.list_by_owner(identity.user_id()).await
    }

    /// Delete one of the caller's records.
    ///
    /// A record that does not exist and a record owned by someone else are
    /// indistinguishable: both are `NotFound`.
    pub async fn delete(&self, identity: &Identity, id: Uuid) -> AppResult<()> {
        let removed = self.store.delete_owned(id, identity.user_id()).await?;
        if removed == 0 {
            return Err(AppError::NotFound("Health record not found".to_string()));
        }

        tracing::info!(user_id = %identity, record_id = %id, "Health record deleted");
        Ok(())
    }

    /// Store text extracted from an uploaded document.
    pub async fn store_extracted(
        &self,
        identity: &Identity,
        input: &Map<String, Value>,
    ) -> AppResult<HealthRecord> {
        let document = ExtractedDocument::from_input(input)?;
        tracing::debug!(
            user_id = %identity,
            file_name = %document.file_name,
            text_len = document.extracted_text.len(),
            "Storing extracted document"
        );
        self.add(identity, document.into()).await
    }

    /// Store a health concerns questionnaire.
    pub async fn store_concerns(
        &self,
        identity: &Identity,
        request: HealthConcernsRequest,
    ) -> AppResult<HealthRecord> {
        self.add(identity, request.into()).await
    }
}
