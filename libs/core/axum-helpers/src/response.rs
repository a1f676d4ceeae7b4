//! The `{code, message, data, traceId}` envelope wrapped around every response.

use crate::context::current_trace_id;
use crate::errors::ErrorCode;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Success envelope carrying a typed payload.
///
/// The trace id is taken from the current request context, so handlers only
/// supply the data and, optionally, a message.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    /// `0` on success
    pub code: i32,
    pub message: String,
    pub data: Option<T>,
    pub trace_id: Uuid,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self::with_message(data, ErrorCode::Success.default_message())
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success.code(),
            message: message.into(),
            data: Some(data),
            trace_id: current_trace_id(),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Envelope whose `data` is always `null`.
///
/// Used for failures and for operations without a payload such as deletes.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmptyResponse {
    #[schema(example = 404)]
    pub code: i32,
    #[schema(example = "User not found")]
    pub message: String,
    #[schema(value_type = Option<Object>)]
    pub data: Option<serde_json::Value>,
    pub trace_id: Uuid,
}

impl EmptyResponse {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
            trace_id: current_trace_id(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Success.code(), message)
    }
}

impl IntoResponse for EmptyResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope_shape() {
        let body = serde_json::to_value(ApiResponse::success(json!({"id": 1}))).unwrap();

        assert_eq!(body["code"], 0);
        assert_eq!(body["message"], "success");
        assert_eq!(body["data"]["id"], 1);
        let trace_id = body["traceId"].as_str().unwrap();
        assert_eq!(Uuid::parse_str(trace_id).unwrap().get_version_num(), 4);
    }

    #[test]
    fn test_custom_message() {
        let envelope = ApiResponse::with_message(5, "user created success");
        assert_eq!(envelope.message, "user created success");
        assert_eq!(envelope.data, Some(5));
    }

    #[test]
    fn test_empty_response_serializes_null_data() {
        let body = serde_json::to_value(EmptyResponse::success("user deleted success")).unwrap();

        assert_eq!(body["code"], 0);
        assert!(body["data"].is_null());
        assert!(body.as_object().unwrap().contains_key("data"));
    }
}
