use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::db::devices::list_for_account;
use crate::middleware::auth::Claims;
use crate::models::common::{error_response, ApiResponse, ErrorKind};

#[tracing::instrument(
    name = "List devices",
    skip(pool, claims),
    fields(email = %claims.email)
)]
pub async fn list_devices(pool: web::Data<PgPool>, claims: web::ReqData<Claims>) -> HttpResponse {
    let account_id = match claims.account_id() {
        Some(id) => id,
        None => return error_response(ErrorKind::Unauthenticated, "Invalid token subject"),
    };

    match list_for_account(&pool, account_id).await {
        Ok(devices) => HttpResponse::Ok().json(ApiResponse::success("Devices", devices)),
        Err(e) => {
            tracing::error!("Database error listing devices: {:?}", e);
            error_response(ErrorKind::Internal, "Failed to list devices")
        }
    }
}
