use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use panchayat_core::error::CoreError;
use panchayat_core::validation::rules::ValidationResult;
use serde_json::json;

/// Shown for every 403, whatever the underlying reason.
pub const FORBIDDEN_MESSAGE: &str = "You do not have permission to perform this action";

/// Shown for every 404.
pub const NOT_FOUND_MESSAGE: &str = "The requested record could not be found";

/// Shown for every 500.
pub const INTERNAL_MESSAGE: &str = "Something went wrong. Please try again later";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `panchayat_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A request body that failed its declarative constraints.
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] validator::ValidationErrors),

    /// A submitted form with per-field errors.
    #[error("Form has {} invalid field(s)", .0.errors.len())]
    InvalidForm(ValidationResult),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => {
                    tracing::debug!(entity = %entity, id = %id, "Not found");
                    (StatusCode::NOT_FOUND, "NOT_FOUND", NOT_FOUND_MESSAGE.to_string())
                }
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => {
                    tracing::info!(reason = %msg, "Forbidden");
                    (StatusCode::FORBIDDEN, "FORBIDDEN", FORBIDDEN_MESSAGE.to_string())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        INTERNAL_MESSAGE.to_string(),
                    )
                }
            },

            // --- Request and form validation ---
            AppError::InvalidRequest(errors) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", errors.to_string())
            }
            AppError::InvalidForm(result) => {
                let body = json!({
                    "error": "Please correct the highlighted fields",
                    "code": "INVALID_FORM",
                    "errors": result.errors,
                });
                return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(body)).into_response();
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    INTERNAL_MESSAGE.to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
