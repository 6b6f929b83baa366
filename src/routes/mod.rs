//! Route modules and the error-to-response mapping.

pub mod events;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use notical_core::NoticalError;

/// Standard API error body. `raw` carries the undecodable model span,
/// `value` the offending timestamp literal; both are omitted otherwise.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Convert domain errors to HTTP responses. Parse and validation failures
/// are expected to occur regularly (model output is unreliable), so they get
/// 422 rather than a generic 500; a dead remote is 502; missing deletion
/// targets are 404.
pub struct ApiError(pub NoticalError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, raw, value) = match &self.0 {
            NoticalError::ModelOutput { raw } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Some(raw.clone()),
                None,
            ),
            NoticalError::InvalidTimestamp { value } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                None,
                Some(value.clone()),
            ),
            NoticalError::EventNotFound { .. } => (StatusCode::NOT_FOUND, None, None),
            NoticalError::Extraction(_) => (StatusCode::BAD_GATEWAY, None, None),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, None, None),
        };

        let body = Json(ErrorResponse {
            error: self.0.to_string(),
            raw,
            value,
        });
        (status, body).into_response()
    }
}

impl From<NoticalError> for ApiError {
    fn from(err: NoticalError) -> Self {
        Self(err)
    }
}
