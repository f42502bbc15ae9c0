use actix_web::{web, HttpResponse, Result};
use secrecy::ExposeSecret;
use sqlx::PgPool;

use crate::config::jwt::JwtSettings;
use crate::db::helpers::ensure_not_exists;
use crate::handlers::auth_handler::generate_token;
use crate::models::auth::LoginResponse;
use crate::models::common::{error_response, ErrorKind};
use crate::models::user::RegistrationRequest;
use crate::ok_or_return;
use crate::utils::password::hash_password;

const INITIAL_DEVICE_NAME: &str = "Initial Device";

#[tracing::instrument(
    name = "Register new account",
    skip(user_form, pool, jwt_settings),
    fields(email = %user_form.email, device_id = %user_form.device_id)
)]
pub async fn register_account(
    user_form: web::Json<RegistrationRequest>,
    pool: web::Data<PgPool>,
    jwt_settings: web::Data<JwtSettings>,
) -> Result<HttpResponse> {
    let email = user_form.email.trim();
    let password = user_form.password.expose_secret();
    let device_id = user_form.device_id.trim();

    if email.is_empty() || password.is_empty() || device_id.is_empty() {
        return Ok(error_response(
            ErrorKind::ValidationError,
            "Please provide email, password, and deviceId",
        ));
    }
    if !email.contains('@') {
        return Ok(error_response(
            ErrorKind::ValidationError,
            "Please provide a valid email",
        ));
    }
    if password.len() < 6 {
        return Ok(error_response(
            ErrorKind::ValidationError,
            "Password must be at least 6 characters",
        ));
    }

    ok_or_return!(ensure_not_exists(
        sqlx::query("SELECT id FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(pool.get_ref())
            .await,
        "Email already in use",
    ));
    ok_or_return!(ensure_not_exists(
        sqlx::query("SELECT device_id FROM devices WHERE device_id = $1")
            .bind(device_id)
            .fetch_optional(pool.get_ref())
            .await,
        "Device ID already registered",
    ));

    // Default display name from the email local part
    let name = email.split('@').next().unwrap_or(email);

    let account_id = match crate::db::users::insert_account_with_device(
        &pool,
        email,
        &hash_password(password),
        name,
        device_id,
        INITIAL_DEVICE_NAME,
    )
    .await
    {
        Ok(id) => id,
        Err(e) => {
            // Lost the race against another registration holding the same
            // email or device id
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.is_unique_violation() {
                    return Ok(error_response(
                        ErrorKind::Conflict,
                        "Email or device ID already registered",
                    ));
                }
            }
            tracing::error!("Failed to register account: {:?}", e);
            return Ok(error_response(ErrorKind::Internal, "Failed to register"));
        }
    };

    match generate_token(account_id, email, &jwt_settings) {
        Ok(token) => Ok(HttpResponse::Created().json(LoginResponse { token })),
        Err(e) => {
            tracing::error!("Error generating JWT token: {:?}", e);
            Ok(error_response(ErrorKind::Internal, "Failed to register"))
        }
    }
}
