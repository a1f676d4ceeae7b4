use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(i32),

    #[error("Email already exists: {0}")]
    DuplicateEmail(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl From<sea_orm::DbErr> for UserError {
    fn from(err: sea_orm::DbErr) -> Self {
        UserError::Internal(format!("Database error: {}", err))
    }
}

/// Client-facing messages; ids and emails stay in the logs.
impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => AppError::NotFound("User not found".to_string()),
            UserError::DuplicateEmail(_) => AppError::Conflict("Email already exists".to_string()),
            UserError::Validation(msg) => AppError::BadRequest(msg),
            UserError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_codes() {
        let cases = [
            (UserError::NotFound(7), StatusCode::NOT_FOUND),
            (
                UserError::DuplicateEmail("a@b.io".to_string()),
                StatusCode::CONFLICT,
            ),
            (
                UserError::Validation("bad".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                UserError::Internal("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_db_errors_become_internal() {
        let err: UserError = sea_orm::DbErr::Custom("timeout".to_string()).into();
        assert!(matches!(err, UserError::Internal(msg) if msg.contains("timeout")));
    }
}
