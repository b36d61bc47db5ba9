//! Error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use extraction::ExtractionError;
use seismic_common::{ErrorKind, ErrorRecord};

/// HTTP status for an error kind. `zero_coordinates` is a diagnostic and
/// still answers 200.
pub fn status_for(kind: Option<ErrorKind>) -> StatusCode {
    kind.and_then(|k| StatusCode::from_u16(k.http_status_code()).ok())
        .unwrap_or(StatusCode::OK)
}

/// A failed request, rendered as `{"error": {"type", "message"}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub record: ErrorRecord,
}

impl ApiError {
    pub fn input(message: impl Into<String>) -> Self {
        Self {
            record: ErrorRecord::input(message),
        }
    }

    pub fn processing(message: impl Into<String>) -> Self {
        Self {
            record: ErrorRecord::processing(message),
        }
    }

    pub fn status(&self) -> StatusCode {
        status_for(self.record.kind)
    }
}

impl From<ExtractionError> for ApiError {
    fn from(err: ExtractionError) -> Self {
        Self {
            record: err.to_record(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.record }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
