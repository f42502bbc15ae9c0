use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::db::devices::register_device;
use crate::handlers::devices::registry_error_response;
use crate::middleware::auth::Claims;
use crate::models::common::{error_response, ApiResponse, ErrorKind};
use crate::models::device::RegisterDeviceRequest;

#[tracing::instrument(
    name = "Add device",
    skip(form, pool, claims),
    fields(email = %claims.email, device_id = %form.device_id)
)]
pub async fn add_device(
    form: web::Json<RegisterDeviceRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> HttpResponse {
    let account_id = match claims.account_id() {
        Some(id) => id,
        None => return error_response(ErrorKind::Unauthenticated, "Invalid token subject"),
    };

    let device_id = form.device_id.trim();
    let name = form.name.trim();
    if device_id.is_empty() || name.is_empty() {
        return error_response(
            ErrorKind::ValidationError,
            "Please provide deviceId and name",
        );
    }

    match register_device(&pool, account_id, device_id, name).await {
        Ok(device) => {
            tracing::info!("Device {} registered", device.device_id);
            HttpResponse::Created().json(ApiResponse::success("Device registered", device))
        }
        Err(e) => registry_error_response(e),
    }
}
