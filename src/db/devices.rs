//! The device registry: every operation that creates, resolves, renames or
//! removes a device goes through here, so the two uniqueness rules and the
//! ownership check live in exactly one place.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::device::Device;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The physical identifier is claimed anywhere in the system.
    #[error("Device ID already registered")]
    DuplicateDeviceId,
    /// The friendly name collides, case-insensitively, within one account.
    #[error("A device with this name already exists")]
    DuplicateName,
    #[error("Device not found")]
    NotFound,
    /// The device exists but belongs to a different account.
    #[error("Not authorized to manage this device")]
    NotOwner,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

fn map_unique_violation(e: sqlx::Error) -> RegistryError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.is_unique_violation() {
            return RegistryError::DuplicateDeviceId;
        }
    }
    RegistryError::Database(e)
}

pub async fn find_by_device_id(
    pool: &PgPool,
    device_id: &str,
) -> Result<Option<Device>, sqlx::Error> {
    sqlx::query_as::<_, Device>(
        r#"
        SELECT device_id, user_id, name, created_at, updated_at
        FROM devices
        WHERE device_id = $1
        "#,
    )
    .bind(device_id)
    .fetch_optional(pool)
    .await
}

pub async fn list_for_account(pool: &PgPool, user_id: Uuid) -> Result<Vec<Device>, sqlx::Error> {
    sqlx::query_as::<_, Device>(
        r#"
        SELECT device_id, user_id, name, created_at, updated_at
        FROM devices
        WHERE user_id = $1
        ORDER BY created_at
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

async fn name_taken_in_account(
    pool: &PgPool,
    user_id: Uuid,
    name: &str,
    exclude_device_id: Option<&str>,
) -> Result<bool, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT device_id FROM devices
        WHERE user_id = $1
          AND LOWER(name) = LOWER($2)
          AND ($3::text IS NULL OR device_id <> $3)
        "#,
    )
    .bind(user_id)
    .bind(name)
    .bind(exclude_device_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.is_some())
}

/// Register a device for `owner`. The `device_id` uniqueness check spans all
/// accounts; the unique index backs it up against races.
#[tracing::instrument(name = "Register device", skip(pool))]
pub async fn register_device(
    pool: &PgPool,
    owner: Uuid,
    device_id: &str,
    name: &str,
) -> Result<Device, RegistryError> {
    if find_by_device_id(pool, device_id).await?.is_some() {
        return Err(RegistryError::DuplicateDeviceId);
    }
    if name_taken_in_account(pool, owner, name, None).await? {
        return Err(RegistryError::DuplicateName);
    }

    let now = Utc::now();
    sqlx::query_as::<_, Device>(
        r#"
        INSERT INTO devices (device_id, user_id, name, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING device_id, user_id, name, created_at, updated_at
        "#,
    )
    .bind(device_id)
    .bind(owner)
    .bind(name)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(map_unique_violation)
}

/// Change a device's friendly name. Ownership is re-checked here even though
/// the session already identifies the account.
#[tracing::instrument(name = "Rename device", skip(pool))]
pub async fn rename_device(
    pool: &PgPool,
    device_id: &str,
    requester: Uuid,
    new_name: &str,
) -> Result<Device, RegistryError> {
    let device = find_by_device_id(pool, device_id)
        .await?
        .ok_or(RegistryError::NotFound)?;
    if device.user_id != requester {
        return Err(RegistryError::NotOwner);
    }
    if name_taken_in_account(pool, requester, new_name, Some(device_id)).await? {
        return Err(RegistryError::DuplicateName);
    }

    let updated = sqlx::query_as::<_, Device>(
        r#"
        UPDATE devices
        SET name = $2, updated_at = $3
        WHERE device_id = $1
        RETURNING device_id, user_id, name, created_at, updated_at
        "#,
    )
    .bind(device_id)
    .bind(new_name)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;
    Ok(updated)
}

/// Remove a device and every measurement it produced, as one transaction.
/// Measurements are deleted before the device row, so a concurrent ingestion
/// can fail with NotFound but can never leave an orphaned measurement.
#[tracing::instrument(name = "Remove device", skip(pool))]
pub async fn remove_device(
    pool: &PgPool,
    device_id: &str,
    requester: Uuid,
) -> Result<(), RegistryError> {
    let device = find_by_device_id(pool, device_id)
        .await?
        .ok_or(RegistryError::NotFound)?;
    if device.user_id != requester {
        return Err(RegistryError::NotOwner);
    }

    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM measurements WHERE device_id = $1")
        .bind(device_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM devices WHERE device_id = $1")
        .bind(device_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}
