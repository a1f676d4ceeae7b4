pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use crate::response::EmptyResponse;
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use thiserror::Error;
use validator::ValidationErrors;

/// Failure summary attached to error responses.
///
/// The request context middleware reads it back to log the internal detail,
/// which never reaches the client.
#[derive(Clone, Debug)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub detail: String,
}

/// Application error type that can be converted to HTTP responses.
///
/// Domain errors convert into this type. The client sees `{code, message}`
/// inside the envelope; anything unanticipated is flattened to the generic
/// internal error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Query string error: {0}")]
    QueryRejection(#[from] QueryRejection),

    #[error("Path error: {0}")]
    PathRejection(#[from] PathRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    /// Validation failure whose fields are ranked by the payload's declaration order.
    #[error("Validation error: {errors}")]
    OrderedValidation {
        errors: ValidationErrors,
        order: &'static [&'static str],
    },

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Method Not Allowed: {0}")]
    MethodNotAllowed(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
}

impl AppError {
    /// Envelope code and the message the client is allowed to see.
    fn parts(&self) -> (ErrorCode, String) {
        match self {
            AppError::NotFound(msg) => (ErrorCode::NotFound, msg.clone()),
            AppError::MethodNotAllowed(msg) => (ErrorCode::MethodNotAllowed, msg.clone()),
            AppError::Conflict(msg) => (ErrorCode::Conflict, msg.clone()),
            AppError::BadRequest(msg) => (ErrorCode::Validation, msg.clone()),
            AppError::ValidationError(errors) => {
                (ErrorCode::Validation, first_violation(errors, &[]))
            }
            AppError::OrderedValidation { errors, order } => {
                (ErrorCode::Validation, first_violation(errors, order))
            }
            AppError::JsonExtractorRejection(e) => (ErrorCode::Validation, e.body_text()),
            AppError::QueryRejection(e) => (ErrorCode::Validation, e.body_text()),
            AppError::PathRejection(e) => (ErrorCode::Validation, e.body_text()),
            AppError::ServiceUnavailable(_) => (
                ErrorCode::ServiceUnavailable,
                ErrorCode::ServiceUnavailable.default_message().to_string(),
            ),
            AppError::Database(_) | AppError::InternalServerError(_) => (
                ErrorCode::Internal,
                ErrorCode::Internal.default_message().to_string(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, message) = self.parts();
        error_response(code.status(), code, message, self.to_string())
    }
}

/// Build a failure envelope and attach the [`ErrorReport`] for logging.
pub fn error_response(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    detail: impl Into<String>,
) -> Response {
    let body = EmptyResponse::new(code.code(), message);
    let mut response = (status, Json(body)).into_response();
    response.extensions_mut().insert(ErrorReport {
        code,
        detail: detail.into(),
    });
    response
}

/// Message of the first violation, then the first error recorded on that field.
///
/// Fields named in `order` win in that order; unlisted fields follow
/// alphabetically.
pub fn first_violation(errors: &ValidationErrors, order: &[&str]) -> String {
    let field_errors = errors.field_errors();
    let mut fields: Vec<&str> = field_errors.keys().map(|field| &**field).collect();
    fields.sort_by_key(|field| {
        let rank = order
            .iter()
            .position(|listed| listed == field)
            .unwrap_or(order.len());
        (rank, *field)
    });

    fields
        .first()
        .and_then(|field| {
            field_errors.get(*field).and_then(|list| list.first()).map(|err| {
                err.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid ({})", field, err.code))
            })
        })
        .unwrap_or_else(|| ErrorCode::Validation.default_message().to_string())
}
