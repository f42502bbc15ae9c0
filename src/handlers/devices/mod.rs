//! Device lifecycle operations on behalf of the authenticated account.
//! Every mutating call re-checks ownership inside the registry; the session
//! alone is never trusted to imply it.

mod add_device;
mod list_devices;
mod remove_device;
mod rename_device;

pub use add_device::add_device;
pub use list_devices::list_devices;
pub use remove_device::remove_device;
pub use rename_device::rename_device;

use actix_web::HttpResponse;

use crate::db::devices::RegistryError;
use crate::models::common::{error_response, ErrorKind};

/// Map a registry failure onto the response taxonomy.
pub(crate) fn registry_error_response(e: RegistryError) -> HttpResponse {
    match e {
        RegistryError::DuplicateDeviceId | RegistryError::DuplicateName => {
            error_response(ErrorKind::Conflict, e.to_string())
        }
        RegistryError::NotFound => error_response(ErrorKind::NotFound, e.to_string()),
        RegistryError::NotOwner => error_response(ErrorKind::Forbidden, e.to_string()),
        RegistryError::Database(e) => {
            tracing::error!("Database error: {:?}", e);
            error_response(ErrorKind::Internal, "Database error")
        }
    }
}
