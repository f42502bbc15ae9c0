use actix_web::{get, put, web, HttpResponse, Result};
use sqlx::PgPool;

use crate::handlers::account::me::get_current_account;
use crate::handlers::account::schedule::update_measurement_schedule;
use crate::middleware::auth::Claims;
use crate::models::user::MeasurementSchedule;

#[get("/me")]
pub async fn me(pool: web::Data<PgPool>, claims: web::ReqData<Claims>) -> HttpResponse {
    get_current_account(pool, claims).await
}

#[put("/config")]
pub async fn update_config(
    form: web::Json<MeasurementSchedule>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    update_measurement_schedule(form, pool, claims).await
}
