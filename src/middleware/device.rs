//! Device credential verification.
//!
//! Wearables authenticate with a single system-wide shared secret in the
//! `x-api-key` header. Passing this check asserts only that the call comes
//! from a legitimate device; ownership is resolved from the payload's
//! `deviceId` downstream.

use std::future::{ready, Ready};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use futures_util::future::LocalBoxFuture;
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};

use crate::config::device::DeviceSettings;
use crate::middleware::auth::auth_error;
use crate::models::common::ErrorKind;

pub const DEVICE_KEY_HEADER: &str = "x-api-key";

/// Marker inserted into request extensions once the shared secret checks
/// out. Handlers that accept device-originated calls take
/// `web::ReqData<DeviceCaller>`; it carries no account identity.
#[derive(Debug, Clone, Copy)]
pub struct DeviceCaller;

/// Compare via fixed-length digests so the comparison does not
/// short-circuit on the first differing byte of the secret.
pub(crate) fn api_key_matches(provided: &str, expected: &SecretString) -> bool {
    Sha256::digest(provided.as_bytes()) == Sha256::digest(expected.expose_secret().as_bytes())
}

fn validate_device_key(req: &ServiceRequest) -> Result<(), Error> {
    let device_settings = req
        .app_data::<web::Data<DeviceSettings>>()
        .ok_or_else(|| auth_error(ErrorKind::Internal, "Device settings not found"))?;

    let provided = req
        .headers()
        .get(DEVICE_KEY_HEADER)
        .ok_or_else(|| auth_error(ErrorKind::Unauthenticated, "Missing API key"))?
        .to_str()
        .map_err(|_| auth_error(ErrorKind::Unauthenticated, "Invalid API key"))?;

    if !api_key_matches(provided, &device_settings.api_key) {
        return Err(auth_error(ErrorKind::Unauthenticated, "Invalid API key"));
    }

    Ok(())
}

pub struct DeviceAuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for DeviceAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = DeviceAuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(DeviceAuthMiddlewareService { service }))
    }
}

pub struct DeviceAuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for DeviceAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Err(e) = validate_device_key(&req) {
            return Box::pin(async move { Err(e) });
        }

        req.extensions_mut().insert(DeviceCaller);

        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await?;
            Ok(res)
        })
    }
}
