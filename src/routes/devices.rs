use actix_web::{delete, get, post, put, web, HttpResponse};
use sqlx::PgPool;

use crate::handlers::devices;
use crate::middleware::auth::Claims;
use crate::models::device::{RegisterDeviceRequest, RenameDeviceRequest};

#[get("/devices")]
pub async fn list(pool: web::Data<PgPool>, claims: web::ReqData<Claims>) -> HttpResponse {
    devices::list_devices(pool, claims).await
}

#[post("/devices")]
pub async fn add(
    form: web::Json<RegisterDeviceRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> HttpResponse {
    devices::add_device(form, pool, claims).await
}

#[put("/devices/{device_id}")]
pub async fn rename(
    path: web::Path<String>,
    form: web::Json<RenameDeviceRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> HttpResponse {
    devices::rename_device(path, form, pool, claims).await
}

#[delete("/devices/{device_id}")]
pub async fn remove(
    path: web::Path<String>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> HttpResponse {
    devices::remove_device(path, pool, claims).await
}
