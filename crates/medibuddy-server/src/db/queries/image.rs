//! User image database queries.

use uuid::Uuid;

use crate::db::models::{ImageMeta, UserImageEntry};
use crate::db::DbPool;
use crate::error::AppResult;

/// Store an image and return its metadata.
pub async fn insert_image(
    pool: &DbPool,
    user_id: Uuid,
    image_data: &[u8],
    image_type: &str,
    image_name: &str,
) -> AppResult<ImageMeta> {
    let size = i64::try_from(image_data.len()).unwrap_or(i64::MAX);
    let meta = sqlx::query_as::<_, ImageMeta>(
        r#"
        INSERT INTO user_images (id, user_id, image_data, image_type, image_name, size, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW())
        RETURNING id, user_id, image_type, image_name, size, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(image_data)
    .bind(image_type)
    .bind(image_name)
    .bind(size)
    .fetch_one(pool)
    .await?;

    Ok(meta)
}

/// One page of image metadata owned by `user_id`, newest first.
pub async fn list_images_by_owner(
    pool: &DbPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> AppResult<Vec<ImageMeta>> {
    let images = sqlx::query_as::<_, ImageMeta>(
        r#"
        SELECT id, user_id, image_type, image_name, size, created_at
        FROM user_images
        WHERE user_id = $1
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(images)
}

/// Number of images owned by `user_id`.
pub async fn count_images_by_owner(pool: &DbPool, user_id: Uuid) -> AppResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_images WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Fetch an image with its bytes, if `user_id` owns it.
pub async fn get_owned_image(
    pool: &DbPool,
    id: Uuid,
    user_id: Uuid,
) -> AppResult<Option<UserImageEntry>> {
    let entry = sqlx::query_as::<_, UserImageEntry>(
        r#"
        SELECT id, user_id, image_data, image_type, image_name, size, created_at, updated_at
        FROM user_images
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(entry)
}

/// Delete an image only if `user_id` owns it. Returns the affected row count.
pub async fn delete_owned_image(pool: &DbPool, id: Uuid, user_id: Uuid) -> AppResult<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM user_images
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
