use actix_web::{web, HttpResponse, Result};
use chrono::NaiveTime;
use sqlx::PgPool;

use crate::db::helpers::db_result;
use crate::db::users::update_schedule;
use crate::middleware::auth::Claims;
use crate::models::common::{error_response, ApiResponse, ErrorKind};
use crate::models::user::MeasurementSchedule;
use crate::ok_or_return;

fn valid_clock_time(value: &str) -> bool {
    NaiveTime::parse_from_str(value, "%H:%M").is_ok()
}

/// Store the measurement schedule on the account. Nothing in this service
/// consumes it; the device-side scheduler reads it back through /account/me.
#[tracing::instrument(
    name = "Update measurement schedule",
    skip(form, pool, claims),
    fields(email = %claims.email)
)]
pub async fn update_measurement_schedule(
    form: web::Json<MeasurementSchedule>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let account_id = match claims.account_id() {
        Some(id) => id,
        None => return Ok(error_response(ErrorKind::Unauthenticated, "Invalid token subject")),
    };

    if form.frequency_minutes < 1 {
        return Ok(error_response(
            ErrorKind::ValidationError,
            "Frequency must be a positive number of minutes",
        ));
    }
    if !valid_clock_time(&form.start_time) || !valid_clock_time(&form.end_time) {
        return Ok(error_response(
            ErrorKind::ValidationError,
            "Start and end times must be HH:MM",
        ));
    }

    ok_or_return!(db_result(
        update_schedule(
            &pool,
            account_id,
            form.frequency_minutes,
            &form.start_time,
            &form.end_time,
        )
        .await
    ));

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Measurement schedule updated",
        form.into_inner(),
    )))
}
