use actix_web::{web, HttpResponse};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use secrecy::ExposeSecret;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::jwt::JwtSettings;
use crate::db::users::find_by_email;
use crate::middleware::auth::Claims;
use crate::models::auth::{LoginRequest, LoginResponse};
use crate::models::common::{error_response, ErrorKind};
use crate::utils::password::verify_password;

/// Mint a session token for an account. Shared by login and registration.
pub fn generate_token(
    account_id: Uuid,
    email: &str,
    jwt_settings: &JwtSettings,
) -> Result<String, jsonwebtoken::errors::Error> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(jwt_settings.expiration_hours))
        .expect("Valid timestamp")
        .timestamp() as usize;

    let claims = Claims {
        sub: account_id.to_string(),
        email: email.to_string(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_settings.secret.expose_secret().as_bytes()),
    )
}

#[tracing::instrument(
    name = "Login attempt",
    skip(login_form, pool, jwt_settings),
    fields(email = %login_form.email)
)]
pub async fn login_user(
    login_form: web::Json<LoginRequest>,
    pool: web::Data<PgPool>,
    jwt_settings: web::Data<JwtSettings>,
) -> HttpResponse {
    if login_form.email.trim().is_empty() {
        return error_response(ErrorKind::ValidationError, "Please provide email and password");
    }

    let account = match find_by_email(&pool, &login_form.email).await {
        Ok(Some(account)) => account,
        Ok(None) => {
            // Same response as a bad password; don't reveal which it was
            tracing::info!("Login for unknown email");
            return error_response(ErrorKind::Unauthenticated, "Invalid credentials");
        }
        Err(e) => {
            tracing::error!("Database error occurred: {:?}", e);
            return error_response(ErrorKind::Internal, "Failed to log in");
        }
    };

    if !verify_password(login_form.password.expose_secret(), &account.password_hash) {
        tracing::info!("Invalid password");
        return error_response(ErrorKind::Unauthenticated, "Invalid credentials");
    }

    match generate_token(account.id, &account.email, &jwt_settings) {
        Ok(token) => HttpResponse::Ok().json(LoginResponse { token }),
        Err(e) => {
            tracing::error!("Error generating JWT token: {:?}", e);
            error_response(ErrorKind::Internal, "Failed to log in")
        }
    }
}
