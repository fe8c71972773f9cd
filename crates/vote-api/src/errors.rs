use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// API error types with JSON responses.
///
/// Storage failures collapse to a generic 500 body; internal detail is
/// logged server-side and never leaks to the client.
#[derive(Debug)]
pub enum ApiError {
    /// Missing or empty required field.
    Validation(String),
    /// Internal server error.
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

impl From<vote_core::CoreError> for ApiError {
    fn from(err: vote_core::CoreError) -> Self {
        tracing::error!("Core error: {err}");
        ApiError::Internal
    }
}
