use actix_web::{web, HttpResponse, Result};
use chrono::Utc;
use sqlx::PgPool;

use crate::db::devices::find_by_device_id;
use crate::db::helpers::{db_result, require_record};
use crate::db::measurements::insert_measurement;
use crate::middleware::device::DeviceCaller;
use crate::models::common::ApiResponse;
use crate::models::measurement::IngestMeasurementRequest;
use crate::ok_or_return;

/// Store one reading posted by a wearable. The shared secret got the call
/// this far; the payload's deviceId decides whose data this is. Values are
/// recorded as sent; this endpoint does not judge them.
#[tracing::instrument(
    name = "Ingest measurement",
    skip(data, pool, _device),
    fields(device_id = %data.device_id)
)]
pub async fn ingest_measurement(
    data: web::Json<IngestMeasurementRequest>,
    pool: web::Data<PgPool>,
    _device: web::ReqData<DeviceCaller>,
) -> Result<HttpResponse> {
    let device = ok_or_return!(require_record(
        find_by_device_id(&pool, &data.device_id).await,
        "Device not registered",
    ));

    // Buffered readings may carry their own timestamp; live ones default to
    // receipt time
    let timestamp = data.timestamp.unwrap_or_else(Utc::now);

    let measurement = ok_or_return!(db_result(
        insert_measurement(&pool, &device, data.heart_rate, data.spo2, timestamp).await
    ));

    tracing::info!("Measurement {} stored for device {}", measurement.id, device.device_id);
    Ok(HttpResponse::Created().json(ApiResponse::success("Measurement recorded", measurement)))
}
