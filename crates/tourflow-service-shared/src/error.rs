//! JSON error envelope shared by all endpoint services.
//!
//! The website consumes a flat `{error, message?, required?}` body with
//! status 400, 405, or 500. Internal errors surface the underlying message
//! verbatim; this backend serves an internal tool, so operator-facing
//! detail is preferred over redaction.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use tourflow_lib::booking::REQUIRED_FIELDS;
use tourflow_lib::Error as LibError;

/// Error envelope returned by every endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    /// HTTP status code for this error.
    #[serde(skip)]
    pub status: u16,

    /// Short error label, e.g. "Method not allowed".
    pub error: String,

    /// Underlying error message, present on internal errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Required-field list, present on validation errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<&'static str>>,
}

impl ApiError {
    /// 400 for a booking submission missing required fields.
    pub fn missing_fields() -> Self {
        Self {
            status: StatusCode::BAD_REQUEST.as_u16(),
            error: "Missing required fields".to_string(),
            message: None,
            required: Some(REQUIRED_FIELDS.to_vec()),
        }
    }

    /// 405 for an unsupported HTTP method.
    pub fn method_not_allowed() -> Self {
        Self {
            status: StatusCode::METHOD_NOT_ALLOWED.as_u16(),
            error: "Method not allowed".to_string(),
            message: None,
            required: None,
        }
    }

    /// 500 with the underlying message surfaced to the caller.
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            error: "Internal server error".to_string(),
            message: Some(message.into()),
            required: None,
        }
    }

    /// Map a library error onto the envelope.
    ///
    /// Validation errors become 400; everything else (store failures,
    /// malformed numeric parameters) is terminal for the request and
    /// becomes 500.
    pub fn from_lib_error(error: &LibError) -> Self {
        match error {
            LibError::MissingFields { .. } => Self::missing_fields(),
            other => Self::internal(other.to_string()),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.error, self.status)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
