//! The measurement store. Writes are append-only: nothing here updates or
//! deletes a reading (removal happens only as part of the device cascade in
//! `db::devices`).

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::device::Device;
use crate::models::measurement::{Measurement, WeeklySummary};

/// Append one reading, tagging it with the device's owner at write time.
pub async fn insert_measurement(
    pool: &PgPool,
    device: &Device,
    heart_rate: f32,
    spo2: f32,
    timestamp: DateTime<Utc>,
) -> Result<Measurement, sqlx::Error> {
    sqlx::query_as::<_, Measurement>(
        r#"
        INSERT INTO measurements (id, device_id, user_id, heart_rate, spo2, timestamp, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, device_id, user_id, heart_rate, spo2, timestamp, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&device.device_id)
    .bind(device.user_id)
    .bind(heart_rate)
    .bind(spo2)
    .bind(timestamp)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
}

/// All of one account's readings inside the half-open window
/// `[start, end)`, ordered by measurement timestamp, not arrival order.
pub async fn measurements_in_window(
    pool: &PgPool,
    user_id: Uuid,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<Measurement>, sqlx::Error> {
    sqlx::query_as::<_, Measurement>(
        r#"
        SELECT id, device_id, user_id, heart_rate, spo2, timestamp, created_at
        FROM measurements
        WHERE user_id = $1
          AND timestamp >= $2
          AND timestamp < $3
        ORDER BY timestamp
        "#,
    )
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await
}

/// Heart-rate statistics over `[window_start, +infinity)`. An empty window
/// yields the all-zeros sentinel, not an error.
#[tracing::instrument(name = "Compute heart rate summary", skip(pool))]
pub async fn heart_rate_summary(
    pool: &PgPool,
    user_id: Uuid,
    window_start: DateTime<Utc>,
) -> Result<WeeklySummary, sqlx::Error> {
    let (avg, min, max) = sqlx::query_as::<_, (Option<f64>, Option<f32>, Option<f32>)>(
        r#"
        SELECT AVG(heart_rate)::float8, MIN(heart_rate), MAX(heart_rate)
        FROM measurements
        WHERE user_id = $1
          AND timestamp >= $2
        "#,
    )
    .bind(user_id)
    .bind(window_start)
    .fetch_one(pool)
    .await?;

    Ok(WeeklySummary {
        avg_heart_rate: avg.unwrap_or(0.0),
        min_heart_rate: min.unwrap_or(0.0),
        max_heart_rate: max.unwrap_or(0.0),
    })
}
