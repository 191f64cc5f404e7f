use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use swarm_core::error::CoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for control misuse and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::Core(core) => match core {
                CoreError::UnknownDevice(_) | CoreError::UnknownJob(_) => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND")
                }
                CoreError::SessionRunning { .. } => (StatusCode::CONFLICT, "SESSION_RUNNING"),
                CoreError::NotRunning => (StatusCode::CONFLICT, "NOT_RUNNING"),
                CoreError::NotAwaitingContinue => (StatusCode::CONFLICT, "NOT_AWAITING_CONTINUE"),
                CoreError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            },
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
        };

        let message = match &self {
            AppError::Core(core) => core.to_string(),
            AppError::BadRequest(msg) => msg.clone(),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
