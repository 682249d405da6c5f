//! Health record database queries.
//!
//! Every read and delete is filtered by `user_id`; there is no query that
//! reaches a record without naming its owner.

use serde_json::Value;
use uuid::Uuid;

use crate::db::models::HealthRecord;
use crate::db::DbPool;
use crate::error::AppResult;

/// Insert a record for `user_id`.
pub async fn insert_health_record(
    pool: &DbPool,
    user_id: Uuid,
    data: &Value,
) -> AppResult<HealthRecord> {
    let record = sqlx::query_as::<_, HealthRecord>(
        r#"
        INSERT INTO health_data (id, user_id, data)
        VALUES ($1, $2, $3)
        RETURNING id, user_id, data
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(data)
    .fetch_one(pool)
    .await?;

    Ok(record)
}

/// All records owned by `user_id`.
pub async fn list_health_records_by_owner(
    pool: &DbPool,
    user_id: Uuid,
) -> AppResult<Vec<HealthRecord>> {
    let records = sqlx::query_as::<_, HealthRecord>(
        r#"
        SELECT id, user_id, data
        FROM health_data
        WHERE user_id = $1
        ORDER BY id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(records)
}

/// Delete a record only if `user_id` owns it. Returns the affected row count.
pub async fn delete_owned_health_record(pool: &DbPool, id: Uuid, user_id: Uuid) -> AppResult<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM health_data
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
