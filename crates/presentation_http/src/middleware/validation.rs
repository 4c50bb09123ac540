//! Request validation
//!
//! Provides a `ValidatedJsonList` extractor that parses a JSON array and
//! validates every element with the validator crate.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

/// Validation error type
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid JSON: {0}")]
    JsonError(#[from] JsonRejection),
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        let message = match &self {
            Self::JsonError(e) => e.body_text(),
            Self::ValidationFailed(msg) => msg.clone(),
        };

        let body = serde_json::json!({
            "error": message,
            "code": "validation_error"
        });

        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

/// Render field errors as `field: message` pairs, prefixed with the element index
fn describe(index: usize, errors: &ValidationErrors) -> Vec<String> {
    let mut described: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                format!(
                    "[{index}].{field}: {}",
                    error
                        .message
                        .as_ref()
                        .map_or_else(|| error.code.to_string(), ToString::to_string)
                )
            })
        })
        .collect();
    described.sort();
    described
}

/// A JSON array extractor that validates each element
///
/// ```ignore
/// async fn handler(ValidatedJsonList(items): ValidatedJsonList<WorkItemEntity>) {
///     // every item passed validation
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ValidatedJsonList<T>(pub Vec<T>);

impl<T, S> FromRequest<S> for ValidatedJsonList<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidationError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(values) = Json::<Vec<T>>::from_request(req, state).await?;

        let errors: Vec<String> = values
            .iter()
            .enumerate()
            .filter_map(|(index, value)| value.validate().err().map(|e| describe(index, &e)))
            .flatten()
            .collect();

        if errors.is_empty() {
            Ok(Self(values))
        } else {
            Err(ValidationError::ValidationFailed(errors.join("; ")))
        }
    }
}
