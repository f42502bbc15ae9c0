use actix_web::{web, HttpResponse, Result};
use chrono::Utc;
use sqlx::PgPool;

use crate::db::helpers::db_result;
use crate::db::measurements::heart_rate_summary;
use crate::middleware::auth::Claims;
use crate::models::common::{error_response, ApiResponse, ErrorKind};
use crate::ok_or_return;
use crate::utils::time_window::trailing_window_start;

/// Heart-rate avg/min/max over the trailing seven calendar days.
/// SpO2 is deliberately not aggregated here.
#[tracing::instrument(
    name = "Weekly summary",
    skip(pool, claims),
    fields(email = %claims.email)
)]
pub async fn weekly_summary(
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let account_id = match claims.account_id() {
        Some(id) => id,
        None => return Ok(error_response(ErrorKind::Unauthenticated, "Invalid token subject")),
    };

    let window_start = trailing_window_start(Utc::now());
    let summary = ok_or_return!(db_result(
        heart_rate_summary(&pool, account_id, window_start).await
    ));

    Ok(HttpResponse::Ok().json(ApiResponse::success("Weekly summary", summary)))
}
