//! Serializes a user's health records for the generation prompt.

use std::sync::Arc;

use crate::auth::Identity;
use crate::error::AppResult;
use crate::services::HealthRecordStore;

/// Read-only view over the caller's records.
#[derive(Clone)]
pub struct HealthContextAssembler {
    store: Arc<dyn HealthRecordStore>,
}

impl HealthContextAssembler {
    pub fn new(store: Arc<dyn HealthRecordStore>) -> Self {
        Self { store }
    }

    /// Every record owned by `identity`, as a JSON array of `{id, user_id, data}`.
    pub async fn assemble(&self, identity: &Identity) -> AppResult<String> {
        let records = self.store.list_by_owner(identity.user_id()).await?;
        tracing::debug!(user_id = %identity, records = records.len(), "Assembled health context");
        Ok(serde_json::to_string(&records)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::testing::MemoryHealthRecordStore;
    use serde_json::{json, Value};
    use uuid::Uuid;

    #[tokio::test]
    async fn test_assemble_includes_only_owned_records() {
        let store = Arc::new(MemoryHealthRecordStore::default());
        let owner = Identity::new(Uuid::new_v4());
        let other = Uuid::new_v4();
        let record = store.seed(owner.user_id(), json!({"cholesterol": 210}));
        store.seed(other, json!({"cholesterol": 150}));

        let context = HealthContextAssembler::new(store).assemble(&owner).await.unwrap();

        let parsed: Value = serde_json::from_str(&context).unwrap();
        assert_eq!(
            parsed,
            json!([{
                "id": record.id,
                "user_id": owner.user_id(),
                "data": {"cholesterol": 210}
            }])
        );
    }

    #[tokio::test]
    async fn test_no_records_is_empty_array() {
        let store = Arc::new(MemoryHealthRecordStore::default());
        let context = HealthContextAssembler::new(store)
            .assemble(&Identity::new(Uuid::new_v4()))
            .await
            .unwrap();
        assert_eq!(context, "[]");
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let store = Arc::new(MemoryHealthRecordStore::failing());
        let result = HealthContextAssembler::new(store)
            .assemble(&Identity::new(Uuid::new_v4()))
            .await;
        assert!(matches!(result, Err(AppError::Database(_))));
    }
}
