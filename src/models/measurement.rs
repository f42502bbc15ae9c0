use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One stored reading. `user_id` is the device's owner at the moment of
/// ingestion, copied onto the row so the range queries never join.
#[derive(Debug, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    pub id: Uuid,
    pub device_id: String,
    pub user_id: Uuid,
    pub heart_rate: f32,
    pub spo2: f32,
    pub timestamp: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// What a wearable posts. `heartRate` and `spo2` are mandatory; values are
/// stored as sent, without range checks. A missing `timestamp` defaults to
/// receipt time.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestMeasurementRequest {
    pub device_id: String,
    pub heart_rate: f32,
    pub spo2: f32,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct DailyQueryParams {
    #[serde(default)]
    pub date: Option<String>,
}

/// Trailing-week heart-rate statistics. All zeros when the window is empty;
/// "no data yet" is not an error.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySummary {
    pub avg_heart_rate: f64,
    pub min_heart_rate: f32,
    pub max_heart_rate: f32,
}
