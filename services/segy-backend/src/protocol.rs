//! Request dispatch for the line protocol.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use extraction::{
    binary_header, convert_file, convert_files, extract_file, file_info, las, run_batch, text_header,
    write_batch_output, BatchRequest, ConversionRequest, ExtractionError, ExtractionRequest,
    MultiConversionRequest,
};
use seismic_common::ErrorRecord;

use crate::config::BackendConfig;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub params: Value,
}

/// One response line, plus whether the loop should stop after it.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub body: Value,
    pub shutdown: bool,
}

impl Reply {
    fn ok(body: Value) -> Self {
        Self { body, shutdown: false }
    }

    pub fn error(record: ErrorRecord) -> Self {
        Self::ok(json!({ "error": record }))
    }
}

type EndpointResult = Result<Value, ExtractionError>;

fn to_value<T: Serialize>(value: T) -> EndpointResult {
    Ok(serde_json::to_value(value)?)
}

fn wrapped<T: Serialize>(key: &str, value: T) -> EndpointResult {
    let mut body = serde_json::Map::new();
    body.insert(key.to_string(), serde_json::to_value(value)?);
    Ok(Value::Object(body))
}

fn param_path(params: &Value, keys: &[&str]) -> Result<PathBuf, ExtractionError> {
    keys.iter()
        .find_map(|key| params.get(*key).and_then(Value::as_str))
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| ExtractionError::Input(format!("Parameter '{}' is required", keys[0])))
}

fn decode<T: serde::de::DeserializeOwned>(params: Value) -> Result<T, ExtractionError> {
    serde_json::from_value(params).map_err(|e| ExtractionError::Input(format!("Invalid params: {}", e)))
}

pub struct Backend {
    config: BackendConfig,
}

impl Backend {
    pub fn new(config: BackendConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Parse and answer one input line.
    pub fn handle_line(&self, line: &str) -> Reply {
        match serde_json::from_str::<Request>(line) {
            Ok(request) => self.handle(request),
            Err(e) => {
                warn!(error = %e, "Rejected malformed request line");
                Reply::error(ErrorRecord::input(format!("Invalid JSON: {}", e)))
            }
        }
    }

    pub fn handle(&self, request: Request) -> Reply {
        let endpoint = request.endpoint.unwrap_or_default();
        let params = match request.params {
            Value::Null => json!({}),
            other => other,
        };
        debug!(endpoint = %endpoint, "Handling request");

        if endpoint == "shutdown" {
            return Reply {
                body: json!({"message": "Shutting down..."}),
                shutdown: true,
            };
        }

        match self.dispatch(&endpoint, params) {
            Ok(body) => Reply::ok(body),
            Err(e) => {
                warn!(endpoint = %endpoint, error = %e, "Request failed");
                Reply::error(e.to_record())
            }
        }
    }

    fn dispatch(&self, endpoint: &str, params: Value) -> EndpointResult {
        let limits = &self.config.limits;
        match endpoint {
            "ping" => Ok(json!({
                "message": "pong",
                "timestamp": chrono::Local::now().to_rfc3339(),
                "status": "healthy",
            })),
            "get_file_info" => wrapped("file_info", file_info(&param_path(&params, &["filepath", "file_path"])?)?),
            "extract_segy" => {
                let path = param_path(&params, &["file_path"])?;
                let request = ExtractionRequest::from_value(params)?;
                to_value(extract_file(&path, &request, limits))
            }
            "extract_segy_batch" => {
                let batch = BatchRequest::from_value(params)?;
                let results = run_batch(&batch, limits)?;
                if let Err(e) = write_batch_output(&self.config.batch_output, &results) {
                    warn!(file = %self.config.batch_output.display(), error = %e, "Failed to write batch output");
                }
                to_value(results)
            }
            "get_ebcdic_header" => wrapped("ebcdic_header", text_header(&param_path(&params, &["file_path"])?)?),
            "get_binary_header" => wrapped("binary_header", binary_header(&param_path(&params, &["file_path"])?)?),
            "convert_coordinates" => {
                if params.get("segy_files").is_some() {
                    let request: MultiConversionRequest = decode(params)?;
                    to_value(convert_files(&request, limits)?)
                } else {
                    let request: ConversionRequest = decode(params)?;
                    to_value(convert_file(&request, limits)?)
                }
            }
            "extract_las_metadata" => wrapped(
                "las_metadata",
                las::extract_metadata(&param_path(&params, &["file_path"])?)?,
            ),
            "get_las_summary" => wrapped("las_summary", las::summary(&param_path(&params, &["file_path"])?)?),
            "get_las_report" => wrapped("las_report", las::report(&param_path(&params, &["file_path"])?)),
            "get_las_status" => wrapped("las_status", las::status()),
            other => Err(ExtractionError::Input(format!("Unknown endpoint: {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> Backend {
        Backend::new(BackendConfig::default())
    }

    #[test]
    fn test_ping() {
        let reply = backend().handle_line(r#"{"endpoint": "ping"}"#);
        assert_eq!(reply.body["message"], "pong");
        assert_eq!(reply.body["status"], "healthy");
        assert!(!reply.shutdown);
    }

    #[test]
    fn test_invalid_json() {
        let reply = backend().handle_line("{not json");
        assert_eq!(reply.body["error"]["type"], "input_error");
        assert!(reply.body["error"]["message"].as_str().unwrap().starts_with("Invalid JSON"));
    }

    #[test]
    fn test_unknown_endpoint() {
        let reply = backend().handle_line(r#"{"endpoint": "calculate", "params": {}}"#);
        assert_eq!(reply.body["error"]["message"], "Unknown endpoint: calculate");
    }

    #[test]
    fn test_shutdown() {
        let reply = backend().handle_line(r#"{"endpoint": "shutdown"}"#);
        assert!(reply.shutdown);
        assert_eq!(reply.body["message"], "Shutting down...");
    }

    #[test]
    fn test_missing_parameter() {
        let reply = backend().handle_line(r#"{"endpoint": "get_file_info", "params": {}}"#);
        assert_eq!(reply.body["error"]["message"], "Parameter 'filepath' is required");
    }

    #[test]
    fn test_las_status() {
        let reply = backend().handle_line(r#"{"endpoint": "get_las_status"}"#);
        assert_eq!(reply.body["las_status"]["available"], true);
    }
}
