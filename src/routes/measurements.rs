use actix_web::{get, post, web, HttpResponse, Result};
use sqlx::PgPool;

use crate::handlers::measurements::{daily_measurements, ingest_measurement, weekly_summary};
use crate::middleware::auth::Claims;
use crate::middleware::device::DeviceCaller;
use crate::models::measurement::{DailyQueryParams, IngestMeasurementRequest};

#[post("/measurement")]
pub async fn ingest(
    data: web::Json<IngestMeasurementRequest>,
    pool: web::Data<PgPool>,
    device: web::ReqData<DeviceCaller>,
) -> Result<HttpResponse> {
    ingest_measurement(data, pool, device).await
}

#[get("/daily")]
pub async fn daily(
    query: web::Query<DailyQueryParams>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    daily_measurements(query, pool, claims).await
}

#[get("/weekly")]
pub async fn weekly(pool: web::Data<PgPool>, claims: web::ReqData<Claims>) -> Result<HttpResponse> {
    weekly_summary(pool, claims).await
}
