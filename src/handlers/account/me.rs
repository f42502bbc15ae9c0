use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::db::users::find_by_id;
use crate::middleware::auth::Claims;
use crate::models::common::{error_response, ApiResponse, ErrorKind};
use crate::models::user::AccountResponse;

#[tracing::instrument(
    name = "Get current account",
    skip(pool, claims),
    fields(email = %claims.email)
)]
pub async fn get_current_account(
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> HttpResponse {
    let account_id = match claims.account_id() {
        Some(id) => id,
        None => return error_response(ErrorKind::Unauthenticated, "Invalid token subject"),
    };

    match find_by_id(&pool, account_id).await {
        Ok(Some(account)) => {
            HttpResponse::Ok().json(ApiResponse::success("Account", AccountResponse::from(&account)))
        }
        // The middleware checked existence, but the account can vanish between
        // that check and this query
        Ok(None) => error_response(ErrorKind::Unauthenticated, "Account no longer exists"),
        Err(e) => {
            tracing::error!("Database error fetching account: {:?}", e);
            error_response(ErrorKind::Internal, "Failed to fetch account")
        }
    }
}
