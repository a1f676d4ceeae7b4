//! Reusable OpenAPI responses for the failure envelope.

use crate::response::EmptyResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({
        "code": 99999,
        "message": "Internal Server Error",
        "data": null,
        "traceId": "5f0c3a52-8d3e-4a8f-9d55-1b1f2f0c9e11"
    })
)]
pub struct InternalServerErrorResponse(pub EmptyResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Validation Error",
    content_type = "application/json",
    example = json!({
        "code": 10001,
        "message": "email must be a valid email address",
        "data": null,
        "traceId": "5f0c3a52-8d3e-4a8f-9d55-1b1f2f0c9e11"
    })
)]
pub struct BadRequestValidationResponse(pub EmptyResponse);

#[derive(ToResponse)]
#[response(
    description = "Resource not found",
    content_type = "application/json",
    example = json!({
        "code": 404,
        "message": "User not found",
        "data": null,
        "traceId": "5f0c3a52-8d3e-4a8f-9d55-1b1f2f0c9e11"
    })
)]
pub struct NotFoundResponse(pub EmptyResponse);

#[derive(ToResponse)]
#[response(
    description = "Conflict - Resource already exists",
    content_type = "application/json",
    example = json!({
        "code": 409,
        "message": "Email already exists",
        "data": null,
        "traceId": "5f0c3a52-8d3e-4a8f-9d55-1b1f2f0c9e11"
    })
)]
pub struct ConflictResponse(pub EmptyResponse);
