use actix_web::{post, web, HttpResponse, Result};
use sqlx::PgPool;

use crate::config::jwt::JwtSettings;
use crate::handlers::registration_handler::register_account;
use crate::models::user::RegistrationRequest;

#[post("/register_user")]
pub async fn register(
    user_form: web::Json<RegistrationRequest>,
    pool: web::Data<PgPool>,
    jwt_settings: web::Data<JwtSettings>,
) -> Result<HttpResponse> {
    register_account(user_form, pool, jwt_settings).await
}
