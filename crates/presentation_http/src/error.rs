//! API error handling
//!
//! Provides sanitized error responses that don't leak implementation details.
//! In production mode, internal errors return generic messages without details.

use application::ApplicationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// Global flag to control error detail exposure
/// Set to false in production to prevent information leakage
static EXPOSE_INTERNAL_ERRORS: AtomicBool = AtomicBool::new(true);

/// Generic text used whenever a message had to be withheld
const GENERIC_MESSAGE: &str = "An error occurred processing your request";

/// Configure whether internal error details should be exposed in responses.
///
/// Set to `false` in production so tracker urls, organization names and
/// connection details stay out of response bodies.
pub fn set_expose_internal_errors(expose: bool) {
    EXPOSE_INTERNAL_ERRORS.store(expose, Ordering::SeqCst);
}

/// Check if internal error details should be exposed
pub(crate) fn should_expose_details() -> bool {
    EXPOSE_INTERNAL_ERRORS.load(Ordering::SeqCst)
}

/// Sanitize an error message according to the global exposure flag
pub(crate) fn sanitize_error_message(msg: &str) -> String {
    sanitize_with(msg, should_expose_details())
}

fn sanitize_with(msg: &str, expose: bool) -> String {
    if expose {
        return msg.to_string();
    }

    let sensitive_patterns = [
        // File paths
        "/home/",
        "/Users/",
        "/var/",
        "/etc/",
        "C:\\",
        // Stack trace indicators
        "stack backtrace",
        "panicked at",
        ".rs:",
        // Connection details
        "connection refused",
        "error sending request",
        "timed out",
        "timeout",
    ];

    let msg_lower = msg.to_lowercase();
    if sensitive_patterns
        .iter()
        .any(|pattern| msg_lower.contains(&pattern.to_lowercase()))
    {
        return GENERIC_MESSAGE.to_string();
    }

    // Tracker urls carry the organization and project
    if msg.contains("://") {
        return GENERIC_MESSAGE.to_string();
    }

    msg.to_string()
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limited")]
    RateLimited,

    /// The work item tracker failed or returned garbage
    #[error("Bad gateway: {0}")]
    BadGateway(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Additional error details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            Self::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                "bad_request",
                sanitize_error_message(msg),
                None,
            ),
            Self::Unauthorized(msg) => {
                let sanitized = if should_expose_details() {
                    msg.clone()
                } else {
                    "The work item tracker rejected the configured credentials".to_string()
                };
                (StatusCode::UNAUTHORIZED, "unauthorized", sanitized, None)
            },
            Self::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                "not_found",
                sanitize_error_message(msg),
                None,
            ),
            Self::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "rate_limited",
                "Rate limit exceeded".to_string(),
                None,
            ),
            Self::BadGateway(msg) => (
                StatusCode::BAD_GATEWAY,
                "bad_gateway",
                "The work item tracker request failed".to_string(),
                should_expose_details().then(|| msg.clone()),
            ),
            Self::ServiceUnavailable(msg) => {
                let sanitized = if should_expose_details() {
                    msg.clone()
                } else {
                    "Service temporarily unavailable".to_string()
                };
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "service_unavailable",
                    sanitized,
                    None,
                )
            },
            Self::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "An internal error occurred".to_string(),
                should_expose_details().then(|| msg.clone()),
            ),
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::Domain(e) => Self::BadRequest(e.to_string()),
            ApplicationError::RateLimited => Self::RateLimited,
            ApplicationError::NotAuthorized(msg) => Self::Unauthorized(msg),
            ApplicationError::ExternalService(msg) => Self::BadGateway(msg),
            ApplicationError::NotFound(msg) => Self::NotFound(msg),
            ApplicationError::Configuration(msg) => Self::ServiceUnavailable(msg),
            ApplicationError::Internal(msg) => Self::Internal(msg),
        }
    }
}
