use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};

/// Generic API response wrapper used across all handlers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response with data
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }

    /// Create a successful response without data
    pub fn success_message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            error: None,
        }
    }

    /// Create an error response. The `error` field carries the machine-stable
    /// failure kind; `message` is for humans.
    pub fn error_with_kind(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            error: Some(kind.as_str().to_string()),
        }
    }
}

/// Failure taxonomy. Every error leaving the request boundary is one of
/// these kinds, serialized in the `error` field of the response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ValidationError,
    Unauthenticated,
    Forbidden,
    NotFound,
    Conflict,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ValidationError => "validation_error",
            ErrorKind::Unauthenticated => "unauthenticated",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Internal => "internal",
        }
    }
}

/// Build the HTTP failure response for a taxonomy kind.
pub fn error_response(kind: ErrorKind, message: impl Into<String>) -> HttpResponse {
    let body = ApiResponse::<()>::error_with_kind(kind, message);
    match kind {
        ErrorKind::ValidationError => HttpResponse::BadRequest().json(body),
        ErrorKind::Unauthenticated => HttpResponse::Unauthorized().json(body),
        ErrorKind::Forbidden => HttpResponse::Forbidden().json(body),
        ErrorKind::NotFound => HttpResponse::NotFound().json(body),
        ErrorKind::Conflict => HttpResponse::Conflict().json(body),
        ErrorKind::Internal => HttpResponse::InternalServerError().json(body),
    }
}
