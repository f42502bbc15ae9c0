use actix_web::web;

pub mod account;
pub mod auth;
pub mod backend_health;
pub mod devices;
pub mod measurements;
pub mod registration;

use crate::middleware::auth::AuthMiddleware;
use crate::middleware::device::DeviceAuthMiddleware;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(registration::register)
        .service(backend_health::backend_health)
        .service(auth::login);

    // Device ingestion (shared-secret authentication, no account identity)
    cfg.service(
        web::scope("/ingest")
            .wrap(DeviceAuthMiddleware)
            .service(measurements::ingest),
    );

    // Measurement views (require a session)
    cfg.service(
        web::scope("/measurements")
            .wrap(AuthMiddleware)
            .service(measurements::daily)
            .service(measurements::weekly),
    );

    // Account and device lifecycle (require a session)
    cfg.service(
        web::scope("/account")
            .wrap(AuthMiddleware)
            .service(account::me)
            .service(account::update_config)
            .service(devices::list)
            .service(devices::add)
            .service(devices::rename)
            .service(devices::remove),
    );
}
