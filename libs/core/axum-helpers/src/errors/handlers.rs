use axum::{
    http::{Method, Uri},
    response::{IntoResponse, Response},
};

use super::{AppError, ErrorCode};

/// Fallback for unknown routes; answers 404 inside the failure envelope.
pub async fn not_found(uri: Uri) -> Response {
    AppError::NotFound(format!(
        "{}: {}",
        ErrorCode::NotFound.default_message(),
        uri.path()
    ))
    .into_response()
}

/// Fallback for known routes hit with an unsupported method; answers 405
/// inside the failure envelope.
pub async fn method_not_allowed(method: Method, uri: Uri) -> Response {
    AppError::MethodNotAllowed(format!(
        "{}: {} {}",
        ErrorCode::MethodNotAllowed.default_message(),
        method,
        uri.path()
    ))
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_not_found_names_path() {
        let response = not_found(Uri::from_static("/api/nowhere")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_method_not_allowed_names_method_and_path() {
        let response = method_not_allowed(Method::PATCH, Uri::from_static("/api/users/1")).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

        let report = response.extensions().get::<crate::errors::ErrorReport>().cloned().unwrap();
        assert_eq!(report.code, ErrorCode::MethodNotAllowed);
        assert!(report.detail.contains("PATCH /api/users/1"));
    }
}
