//! Application-level codes carried in the `code` field of every envelope.
//!
//! `0` means success. HTTP-like codes (`404`, `405`, `409`) mark recognised domain
//! failures; `10001` and `99999` are the fixed validation and internal codes.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! assert_eq!(ErrorCode::Validation.code(), 10001);
//! assert_eq!(ErrorCode::Internal.default_message(), "Internal Server Error");
//! ```

use axum::http::StatusCode;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Request handled successfully
    Success,

    /// Requested resource or route does not exist
    NotFound,

    /// Route exists but does not accept the request method
    MethodNotAllowed,

    /// Request conflicts with stored state, e.g. a duplicate email
    Conflict,

    /// Malformed or invalid request input
    Validation,

    /// A dependency (usually the database) is unreachable
    ServiceUnavailable,

    /// Anything unanticipated; details stay in the logs
    Internal,
}

impl ErrorCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::NotFound => "NOT_FOUND",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::Conflict => "CONFLICT",
            Self::Validation => "VALIDATION_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::Internal => "INTERNAL_ERROR",
        }
    }

    /// Integer sent to clients in the envelope `code` field
    pub const fn code(&self) -> i32 {
        match self {
            Self::Success => 0,
            Self::NotFound => 404,
            Self::MethodNotAllowed => 405,
            Self::Conflict => 409,
            Self::Validation => 10001,
            Self::ServiceUnavailable => 503,
            Self::Internal => 99999,
        }
    }

    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Validation => StatusCode::BAD_REQUEST,
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub const fn default_message(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::NotFound => "The requested resource was not found",
            Self::MethodNotAllowed => "Method not allowed",
            Self::Conflict => "Resource already exists",
            Self::Validation => "Request validation failed",
            Self::ServiceUnavailable => "Service is temporarily unavailable",
            Self::Internal => "Internal Server Error",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
