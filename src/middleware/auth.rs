//! Session credential verification.
//!
//! Validates the `Authorization: Bearer` JWT, then re-resolves the subject
//! against the accounts table: a syntactically valid token whose account has
//! vanished is indistinguishable from no credential at all to the caller.

use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::InternalError,
    http::header,
    web, Error, HttpMessage,
};
use futures_util::future::LocalBoxFuture;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::jwt::JwtSettings;
use crate::db::users::account_exists;
use crate::models::common::{error_response, ErrorKind};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // Subject (account id)
    pub email: String,
    pub exp: usize, // Expiration time (as UTC timestamp)
}

impl Claims {
    /// Parse the account ID from the claims subject field.
    /// Returns None if the UUID is invalid.
    pub fn account_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }
}

/// An actix `Error` whose response body is the structured failure envelope.
pub(crate) fn auth_error(kind: ErrorKind, message: &str) -> Error {
    InternalError::from_response(message.to_string(), error_response(kind, message)).into()
}

/// Extract and validate the bearer token, returning the decoded claims.
/// Performs no account lookup; that happens in the middleware future.
pub fn validate_jwt_from_request(req: &ServiceRequest) -> Result<Claims, Error> {
    let jwt_settings = req
        .app_data::<web::Data<JwtSettings>>()
        .ok_or_else(|| auth_error(ErrorKind::Internal, "JWT settings not found"))?;

    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| auth_error(ErrorKind::Unauthenticated, "No authorization header"))?
        .to_str()
        .map_err(|_| auth_error(ErrorKind::Unauthenticated, "Invalid authorization header"))?;

    if !auth_header.starts_with("Bearer ") {
        return Err(auth_error(
            ErrorKind::Unauthenticated,
            "Invalid authorization header format",
        ));
    }

    let token = &auth_header[7..]; // Skip "Bearer "
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_settings.secret.expose_secret().as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|e| {
        tracing::info!("Failed to decode token: {:?}", e);
        auth_error(ErrorKind::Unauthenticated, "Invalid token")
    })?;

    Ok(token_data.claims)
}

pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        let claims = match validate_jwt_from_request(&req) {
            Ok(claims) => claims,
            Err(e) => return Box::pin(async move { Err(e) }),
        };

        Box::pin(async move {
            let pool = req
                .app_data::<web::Data<PgPool>>()
                .ok_or_else(|| auth_error(ErrorKind::Internal, "Database pool not found"))?
                .clone();

            let account_id = claims.account_id().ok_or_else(|| {
                auth_error(ErrorKind::Unauthenticated, "Invalid token subject")
            })?;

            // The subject may have been deleted since the token was minted.
            match account_exists(&pool, account_id).await {
                Ok(true) => {}
                Ok(false) => {
                    tracing::info!("Token subject {} no longer resolves to an account", account_id);
                    return Err(auth_error(
                        ErrorKind::Unauthenticated,
                        "Account no longer exists",
                    ));
                }
                Err(e) => {
                    tracing::error!("Failed to resolve token subject: {:?}", e);
                    return Err(auth_error(ErrorKind::Internal, "Failed to verify credentials"));
                }
            }

            // Store the claims in the request extensions for handlers to access
            req.extensions_mut().insert(claims);

            service.call(req).await
        })
    }
}
