use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Everything a handler can fail with. Converted to an HTTP response at
/// the handler boundary; nothing is retried.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Path id that doesn't parse as an integer.
    #[error("Task '{0}' invalid")]
    InvalidId(String),

    /// No task with the given id.
    #[error("Task '{0}' not found")]
    NotFound(i64),

    /// Required body fields missing.
    #[error("Invalid data")]
    InvalidPayload,

    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InvalidId(_) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "message": self.to_string() })))
                    .into_response()
            }
            ApiError::NotFound(_) => {
                (StatusCode::NOT_FOUND, Json(json!({ "message": self.to_string() })))
                    .into_response()
            }
            ApiError::InvalidPayload => {
                (StatusCode::BAD_REQUEST, Json(json!({ "details": "Invalid data" })))
                    .into_response()
            }
            ApiError::Db(err) => {
                tracing::error!("database error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "internal server error" })),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_id() {
        assert_eq!(ApiError::InvalidId("abc".into()).to_string(), "Task 'abc' invalid");
        assert_eq!(ApiError::NotFound(42).to_string(), "Task '42' not found");
    }

    #[test]
    fn status_codes_match_error_kinds() {
        assert_eq!(
            ApiError::InvalidId("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound(1).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::InvalidPayload.into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }
}
