//! Database query helper functions to reduce boilerplate error handling.
//!
//! These helpers simplify common patterns like:
//! - Fetching a required record (not_found if missing)
//! - Ensuring a record doesn't exist (conflict if it does)
//!
//! All of them produce the structured failure envelope, so a handler built on
//! them can only emit taxonomy-conformant errors.

use actix_web::HttpResponse;

use crate::models::common::{error_response, ErrorKind};

/// Macro for handlers returning `Result<HttpResponse>`.
/// Converts a `DbResult<T>` to return `Ok(error_response)` on error.
///
/// # Example
/// ```ignore
/// let device = ok_or_return!(require_record(
///     find_by_device_id(&pool, &device_id).await,
///     "Device not registered"
/// ));
/// ```
#[macro_export]
macro_rules! ok_or_return {
    ($expr:expr) => {
        match $expr {
            Ok(val) => val,
            Err(response) => return Ok(response),
        }
    };
}

/// Result type for database operations that return an HttpResponse on error
pub type DbResult<T> = Result<T, HttpResponse>;

/// Unwrap an optional database result, returning not_found if None.
pub fn require_record<T>(
    result: Result<Option<T>, sqlx::Error>,
    not_found_message: &str,
) -> DbResult<T> {
    match result {
        Ok(Some(record)) => Ok(record),
        Ok(None) => Err(error_response(ErrorKind::NotFound, not_found_message)),
        Err(e) => {
            tracing::error!("Database error: {}", e);
            Err(error_response(ErrorKind::Internal, "Database error"))
        }
    }
}

/// Ensure a record does NOT exist, returning conflict if it does.
pub fn ensure_not_exists<T>(
    result: Result<Option<T>, sqlx::Error>,
    conflict_message: &str,
) -> DbResult<()> {
    match result {
        Ok(Some(_)) => Err(error_response(ErrorKind::Conflict, conflict_message)),
        Ok(None) => Ok(()),
        Err(e) => {
            tracing::error!("Database error: {}", e);
            Err(error_response(ErrorKind::Internal, "Database error"))
        }
    }
}

/// Unwrap a database result, returning internal on error.
/// Use this when you just need to handle the Err case.
pub fn db_result<T>(result: Result<T, sqlx::Error>) -> DbResult<T> {
    result.map_err(|e| {
        tracing::error!("Database error: {}", e);
        error_response(ErrorKind::Internal, "Database error")
    })
}
