//! HTTP request handlers.

pub mod coordinates;
pub mod files;
pub mod health;
pub mod las;
pub mod segy;

use serde::Deserialize;
use serde_json::Value;
use tracing::error;

use crate::error::{ApiError, ApiResult};

#[derive(Debug, Default, Deserialize)]
pub struct FilePathQuery {
    pub file_path: Option<String>,
}

/// Run file-bound work off the async executor.
pub(crate) async fn run_blocking<T, F>(work: F) -> ApiResult<T>
where
    F: FnOnce() -> ApiResult<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(work).await {
        Ok(result) => result,
        Err(e) => {
            error!(error = %e, "Blocking task failed");
            Err(ApiError::processing(format!("Worker task failed: {}", e)))
        }
    }
}

/// Decode a JSON body into a request shape; shape errors are input errors.
pub(crate) fn decode<T: serde::de::DeserializeOwned>(body: Value) -> ApiResult<T> {
    serde_json::from_value(body).map_err(|e| ApiError::input(format!("Invalid request: {}", e)))
}

/// Pull a required string field out of a JSON object body.
pub(crate) fn required_path(body: &Value, field: &str) -> ApiResult<String> {
    match body.get(field).and_then(Value::as_str) {
        Some(path) if !path.is_empty() => Ok(path.to_string()),
        _ => Err(ApiError::input(format!("{} is required", field))),
    }
}
