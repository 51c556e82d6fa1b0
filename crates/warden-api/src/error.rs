//! API error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error};
use warden_core::CoreError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Maps an error to its status code, error code and client-visible message.
///
/// This is the only place where error kinds meet HTTP. Messages never carry
/// internal detail; the three session failures and a vanished account all
/// share one response, as do unknown email and wrong password.
pub fn status_for(err: &ApiError) -> (StatusCode, &'static str, String) {
    const UNAUTHORIZED: (StatusCode, &str) = (StatusCode::UNAUTHORIZED, "UNAUTHORIZED");
    const INTERNAL: (StatusCode, &str) = (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR");

    let ((status, code), message) = match err {
        ApiError::BadRequest(msg) => ((StatusCode::BAD_REQUEST, "BAD_REQUEST"), msg.as_str()),
        ApiError::Unauthorized => (UNAUTHORIZED, "Unauthorized"),
        ApiError::Internal(_) => (INTERNAL, "Error processing request"),
        ApiError::Core(core) => match core {
            CoreError::Validation(msg) => ((StatusCode::BAD_REQUEST, "BAD_REQUEST"), msg.as_str()),
            CoreError::InvalidCredentials => (
                (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
                "Invalid credentials",
            ),
            CoreError::Session(_) | CoreError::AccountNotFound => (UNAUTHORIZED, "Unauthorized"),
            CoreError::StoreConflict(_) => {
                ((StatusCode::CONFLICT, "CONFLICT"), "Email already exists")
            }
            CoreError::Credential(_) | CoreError::StoreUnavailable(_) => {
                (INTERNAL, "Error processing request")
            }
        },
    };

    (status, code, message.to_string())
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = status_for(&self);

        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            debug!("Request rejected: {}", self);
        }

        let body = axum::Json(json!({
            "error": {
                "code": code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
