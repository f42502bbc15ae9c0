use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::user::Account;

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>(
        r#"
        SELECT id, email, password_hash, name,
               schedule_frequency_minutes, schedule_start, schedule_end,
               created_at, updated_at
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>(
        r#"
        SELECT id, email, password_hash, name,
               schedule_frequency_minutes, schedule_start, schedule_end,
               created_at, updated_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Cheap existence probe used by the session middleware on every request.
pub async fn account_exists(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let row = sqlx::query("SELECT 1 AS one FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.is_some())
}

/// Create the account and its first device as one atomic unit, so a failed
/// device insert never leaves a deviceless account behind.
pub async fn insert_account_with_device(
    pool: &PgPool,
    email: &str,
    password_hash: &str,
    name: &str,
    device_id: &str,
    device_name: &str,
) -> Result<Uuid, sqlx::Error> {
    let account_id = Uuid::new_v4();
    let now = Utc::now();

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO users (id, email, password_hash, name, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(account_id)
    .bind(email)
    .bind(password_hash)
    .bind(name)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute user insert query: {:?}", e);
        e
    })?;

    sqlx::query(
        r#"
        INSERT INTO devices (device_id, user_id, name, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(device_id)
    .bind(account_id)
    .bind(device_name)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute device insert query: {:?}", e);
        e
    })?;

    tx.commit().await?;
    Ok(account_id)
}

pub async fn update_schedule(
    pool: &PgPool,
    account_id: Uuid,
    frequency_minutes: i32,
    start_time: &str,
    end_time: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE users
        SET schedule_frequency_minutes = $2,
            schedule_start = $3,
            schedule_end = $4,
            updated_at = $5
        WHERE id = $1
        "#,
    )
    .bind(account_id)
    .bind(frequency_minutes)
    .bind(start_time)
    .bind(end_time)
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(())
}
