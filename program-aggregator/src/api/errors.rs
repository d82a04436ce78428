use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use thiserror::Error;

/// JSON body for every non-200 response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ApiError {
    #[error("missing or invalid shared secret")]
    Unauthorized,
    #[error("{name} must be a positive integer, got {value:?}")]
    InvalidParameter { name: &'static str, value: String },
}

impl ApiError {
    fn error_metadata(&self) -> (&'static str, StatusCode) {
        match self {
            ApiError::Unauthorized => ("unauthorized", StatusCode::FORBIDDEN),
            ApiError::InvalidParameter { .. } => ("invalid_parameter", StatusCode::BAD_REQUEST),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (code, status) = self.error_metadata();
        let detail = match &self {
            // Say nothing about why a secret was rejected
            ApiError::Unauthorized => None,
            ApiError::InvalidParameter { .. } => Some(self.to_string()),
        };

        (status, Json(ErrorResponse { error: code, detail })).into_response()
    }
}
