use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::db::devices::remove_device as remove_from_registry;
use crate::handlers::devices::registry_error_response;
use crate::middleware::auth::Claims;
use crate::models::common::{error_response, ApiResponse, ErrorKind};

/// Remove one of the caller's devices. The registry deletes the device's
/// measurements in the same transaction.
#[tracing::instrument(
    name = "Remove device",
    skip(pool, claims),
    fields(email = %claims.email)
)]
pub async fn remove_device(
    path: web::Path<String>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> HttpResponse {
    let account_id = match claims.account_id() {
        Some(id) => id,
        None => return error_response(ErrorKind::Unauthenticated, "Invalid token subject"),
    };

    let device_id = path.into_inner();
    match remove_from_registry(&pool, &device_id, account_id).await {
        Ok(()) => {
            tracing::info!("Device {} removed with its measurements", device_id);
            HttpResponse::Ok().json(ApiResponse::<()>::success_message("Device removed"))
        }
        Err(e) => registry_error_response(e),
    }
}
