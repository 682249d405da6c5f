//! User database queries.

use sqlx::PgExecutor;
use uuid::Uuid;

use crate::db::models::{PersonalInfo, UserEntry};
use crate::db::DbPool;
use crate::error::AppResult;

const USER_COLUMNS: &str = "id, name, email, password, gender, birth_date, height, weight, \
                            ethnicity, country, created_at, updated_at";

/// Insert a new user and return the stored row.
pub async fn insert_user(
    pool: &DbPool,
    name: &str,
    email: &str,
    password_hash: &str,
) -> AppResult<UserEntry> {
    let entry = sqlx::query_as::<_, UserEntry>(&format!(
        r#"
        INSERT INTO users (id, name, email, password, created_at, updated_at)
        VALUES ($1, $2, $3, $4, NOW(), NOW())
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .fetch_one(pool)
    .await?;

    Ok(entry)
}

/// Get a user by email.
pub async fn get_user_by_email(pool: &DbPool, email: &str) -> AppResult<Option<UserEntry>> {
    let entry = sqlx::query_as::<_, UserEntry>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(entry)
}

/// Get a user by ID.
pub async fn get_user_by_id<'e, E>(executor: E, id: Uuid) -> AppResult<Option<UserEntry>>
where
    E: PgExecutor<'e>,
{
    let entry = sqlx::query_as::<_, UserEntry>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(entry)
}

/// Update the display name. Returns the updated row, if the user exists.
pub async fn update_user_name(pool: &DbPool, id: Uuid, name: &str) -> AppResult<Option<UserEntry>> {
    let entry = sqlx::query_as::<_, UserEntry>(&format!(
        r#"
        UPDATE users
        SET name = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(entry)
}

/// Overwrite personal information. Meant to run inside a transaction.
pub async fn update_personal_info<'e, E>(
    executor: E,
    id: Uuid,
    info: &PersonalInfo,
) -> AppResult<Option<UserEntry>>
where
    E: PgExecutor<'e>,
{
    let entry = sqlx::query_as::<_, UserEntry>(&format!(
        r#"
        UPDATE users
        SET gender = $2, birth_date = $3, height = $4, weight = $5,
            ethnicity = $6, country = $7, updated_at = NOW()
        WHERE id = $1
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&info.gender)
    .bind(info.birth_date)
    .bind(info.height)
    .bind(info.weight)
    .bind(&info.ethnicity)
    .bind(&info.country)
    .fetch_optional(executor)
    .await?;

    Ok(entry)
}

/// Replace the stored password hash.
pub async fn update_password_hash(pool: &DbPool, id: Uuid, password_hash: &str) -> AppResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET password = $2, updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(password_hash)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
