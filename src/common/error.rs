// Error handling types for the API

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::error;

use super::response::error_body;

// Whether error details may be included in responses. Set once at startup
// from the server environment; defaults to hiding details.
static DEV_MODE: OnceLock<bool> = OnceLock::new();

pub fn set_dev_mode(enabled: bool) {
    let _ = DEV_MODE.set(enabled);
}

fn dev_mode() -> bool {
    DEV_MODE.get().copied().unwrap_or(false)
}

/// Failure of an upstream fetch or decode. Read paths recover from this into
/// defaults at the client boundary; write paths surface it to the caller.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),

    #[error("response decode failed: {0}")]
    Decode(String),
}

/// API error types, mapped to the uniform error envelope.
#[derive(Debug)]
pub enum ApiError {
    MissingToken,
    InvalidToken,
    MissingCode,
    ExchangeFailed(String),
    RefreshUnsupported,
    Validation(String),
    UpstreamWrite(String),
    NotFound(String),
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::MissingToken => write!(f, "Missing Token"),
            ApiError::InvalidToken => write!(f, "Invalid Token"),
            ApiError::MissingCode => write!(f, "Missing Code"),
            ApiError::ExchangeFailed(msg) => write!(f, "Exchange Failed: {}", msg),
            ApiError::RefreshUnsupported => write!(f, "Refresh Unsupported"),
            ApiError::Validation(msg) => write!(f, "Validation Error: {}", msg),
            ApiError::UpstreamWrite(msg) => write!(f, "Upstream Write Failed: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, code, message, details): (StatusCode, &str, String, Option<Value>) =
            match self {
                ApiError::MissingToken => (
                    StatusCode::UNAUTHORIZED,
                    "MISSING_TOKEN",
                    "Access token is required".to_string(),
                    None,
                ),
                ApiError::InvalidToken => (
                    StatusCode::FORBIDDEN,
                    "INVALID_TOKEN",
                    "Invalid or expired token".to_string(),
                    None,
                ),
                ApiError::MissingCode => (
                    StatusCode::BAD_REQUEST,
                    "MISSING_CODE",
                    "Authorization code is required".to_string(),
                    None,
                ),
                ApiError::ExchangeFailed(detail) => (
                    StatusCode::BAD_GATEWAY,
                    "EXCHANGE_FAILED",
                    "Failed to process authentication callback".to_string(),
                    Some(json!(detail)),
                ),
                ApiError::RefreshUnsupported => (
                    StatusCode::BAD_REQUEST,
                    "REFRESH_UNSUPPORTED",
                    "This session cannot be refreshed".to_string(),
                    None,
                ),
                ApiError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg, None)
                }
                ApiError::UpstreamWrite(detail) => (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_WRITE_FAILED",
                    "Upstream update failed".to_string(),
                    Some(json!(detail)),
                ),
                ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg, None),
                ApiError::Internal(detail) => {
                    error!(detail = %detail, "internal error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "Internal server error".to_string(),
                        Some(json!(detail)),
                    )
                }
            };

        // Details never leave the server outside of development.
        let details = if dev_mode() { details } else { None };

        (status, Json(error_body(code, &message, details))).into_response()
    }
}
