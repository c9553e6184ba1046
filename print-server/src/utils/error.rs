//! Unified error handling
//!
//! Every handler returns [`AppResult`]; [`AppError`] renders the JSON
//! error envelope.
//!
//! | Variant | Status | Body |
//! |---------|--------|------|
//! | Unauthorized | 401 | `{"error": "unauthorized"}` |
//! | PayloadTooLarge | 400 | `{"error": "text too long"}` |
//! | Validation | 422 | `{"detail": [{"loc": ["query", field], "msg": ..., "type": "value_error"}], "body": null}` |
//! | Printer | 500 | `{"error": "printer error"}` |
//! | Internal | 500 | `{"error": "internal server error"}` |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use receipt_printer::PrintError;
use serde_json::json;
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing or wrong API key (401)
    #[error("Unauthorized")]
    Unauthorized,

    /// Decoded text above the length limit (400)
    #[error("Text too long: {len} chars (max {max})")]
    PayloadTooLarge { len: usize, max: usize },

    /// Malformed or missing request parameter (422)
    #[error("Validation failed for {field}: {message}")]
    Validation { field: String, message: String },

    /// Device failure (500)
    #[error("Printer error: {0}")]
    Printer(#[from] PrintError),

    /// Internal error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, json!({ "error": "unauthorized" }))
            }

            AppError::PayloadTooLarge { .. } => {
                (StatusCode::BAD_REQUEST, json!({ "error": "text too long" }))
            }

            AppError::Validation { field, message } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({
                    "detail": [{
                        "loc": ["query", field],
                        "msg": message,
                        "type": "value_error",
                    }],
                    "body": null,
                }),
            ),

            AppError::Printer(e) => {
                error!(target: "printer", error = %e, "Print job failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "printer error" }),
                )
            }

            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
