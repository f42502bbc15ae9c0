use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::db::devices::rename_device as rename_in_registry;
use crate::handlers::devices::registry_error_response;
use crate::middleware::auth::Claims;
use crate::models::common::{error_response, ApiResponse, ErrorKind};
use crate::models::device::RenameDeviceRequest;

#[tracing::instrument(
    name = "Rename device",
    skip(form, pool, claims),
    fields(email = %claims.email)
)]
pub async fn rename_device(
    path: web::Path<String>,
    form: web::Json<RenameDeviceRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> HttpResponse {
    let account_id = match claims.account_id() {
        Some(id) => id,
        None => return error_response(ErrorKind::Unauthenticated, "Invalid token subject"),
    };

    let device_id = path.into_inner();
    let name = form.name.trim();
    if name.is_empty() {
        return error_response(ErrorKind::ValidationError, "Please provide a device name");
    }

    match rename_in_registry(&pool, &device_id, account_id, name).await {
        Ok(device) => HttpResponse::Ok().json(ApiResponse::success("Device renamed", device)),
        Err(e) => registry_error_response(e),
    }
}
