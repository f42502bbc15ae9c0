use actix_web::{web, HttpResponse, Result};
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::db::helpers::db_result;
use crate::db::measurements::measurements_in_window;
use crate::middleware::auth::Claims;
use crate::models::common::{error_response, ApiResponse, ErrorKind};
use crate::models::measurement::DailyQueryParams;
use crate::ok_or_return;
use crate::utils::time_window::daily_window;

/// One UTC calendar day of the caller's readings, ordered by timestamp.
/// An empty day is a valid, empty list.
#[tracing::instrument(
    name = "Daily measurements",
    skip(query, pool, claims),
    fields(email = %claims.email)
)]
pub async fn daily_measurements(
    query: web::Query<DailyQueryParams>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let account_id = match claims.account_id() {
        Some(id) => id,
        None => return Ok(error_response(ErrorKind::Unauthenticated, "Invalid token subject")),
    };

    let date_str = match &query.date {
        Some(date) => date,
        None => {
            return Ok(error_response(
                ErrorKind::ValidationError,
                "Please provide a 'date' query parameter",
            ))
        }
    };
    let date = match NaiveDate::parse_from_str(date_str, "%Y-%m-%d") {
        Ok(date) => date,
        Err(_) => {
            return Ok(error_response(
                ErrorKind::ValidationError,
                "Date must be formatted as YYYY-MM-DD",
            ))
        }
    };

    let (start, end) = daily_window(date);
    let measurements = ok_or_return!(db_result(
        measurements_in_window(&pool, account_id, start, end).await
    ));

    Ok(HttpResponse::Ok().json(ApiResponse::success("Daily measurements", measurements)))
}
