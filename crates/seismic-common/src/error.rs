//! Structured error records returned to callers.
//!
//! Every failure that reaches a caller is data: a `{type, message}` object
//! embedded in the response rather than a raw error string or stack trace.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error taxonomy surfaced in `{type, message}` records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Missing or malformed request shape.
    InputError,
    /// File does not exist or has an unaccepted extension.
    PathError,
    /// Failure while opening, parsing or decoding a candidate file.
    ProcessingError,
    /// Diagnostic: extracted source coordinates are degenerate.
    ZeroCoordinates,
}

impl ErrorKind {
    /// Wire name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InputError => "input_error",
            ErrorKind::PathError => "path_error",
            ErrorKind::ProcessingError => "processing_error",
            ErrorKind::ZeroCoordinates => "zero_coordinates",
        }
    }

    /// Whether this kind means the result carries no usable data.
    ///
    /// `ZeroCoordinates` is a diagnostic attached to an otherwise
    /// successful extraction.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ErrorKind::ZeroCoordinates)
    }

    /// HTTP status code used by the service layer for this kind.
    pub fn http_status_code(&self) -> u16 {
        match self {
            ErrorKind::InputError => 400,
            ErrorKind::PathError => 404,
            ErrorKind::ProcessingError => 500,
            ErrorKind::ZeroCoordinates => 200,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown error kind: {0}")]
pub struct UnknownErrorKind(pub String);

impl FromStr for ErrorKind {
    type Err = UnknownErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "input_error" => Ok(ErrorKind::InputError),
            "path_error" => Ok(ErrorKind::PathError),
            "processing_error" => Ok(ErrorKind::ProcessingError),
            "zero_coordinates" => Ok(ErrorKind::ZeroCoordinates),
            other => Err(UnknownErrorKind(other.to_string())),
        }
    }
}

/// A `{type, message}` error object.
///
/// Both members serialize as `null` when there is no error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    #[serde(rename = "type")]
    pub kind: Option<ErrorKind>,
    pub message: Option<String>,
}

impl ErrorRecord {
    /// The empty record: `{"type": null, "message": null}`.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind: Some(kind),
            message: Some(message.into()),
        }
    }

    pub fn input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InputError, message)
    }

    pub fn path(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PathError, message)
    }

    pub fn processing(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ProcessingError, message)
    }

    pub fn zero_coordinates(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ZeroCoordinates, message)
    }

    /// True when a kind is set, including the zero-coordinate diagnostic.
    pub fn is_error(&self) -> bool {
        self.kind.is_some()
    }

    /// True when the record describes a failure rather than a diagnostic.
    pub fn is_fatal(&self) -> bool {
        self.kind.map(|k| k.is_fatal()).unwrap_or(false)
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.kind, &self.message) {
            (Some(kind), Some(message)) => write!(f, "{}: {}", kind, message),
            (Some(kind), None) => write!(f, "{}", kind),
            (None, _) => f.write_str("no error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_serializes_as_nulls() {
        let json = serde_json::to_value(ErrorRecord::none()).unwrap();
        assert_eq!(json, serde_json::json!({"type": null, "message": null}));
    }

    #[test]
    fn test_kind_wire_names() {
        let record = ErrorRecord::path("File not found: /tmp/x.sgy");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "path_error");
        assert_eq!(json["message"], "File not found: /tmp/x.sgy");

        for kind in [
            ErrorKind::InputError,
            ErrorKind::PathError,
            ErrorKind::ProcessingError,
            ErrorKind::ZeroCoordinates,
        ] {
            let parsed: ErrorKind = kind.as_str().parse().unwrap();
            assert_eq!(parsed, kind);
        }
        assert!("system_error".parse::<ErrorKind>().is_err());
    }

    #[test]
    fn test_zero_coordinates_is_not_fatal() {
        let diag = ErrorRecord::zero_coordinates("All Source_X and Source_Y are zero");
        assert!(diag.is_error());
        assert!(!diag.is_fatal());
        assert!(ErrorRecord::processing("boom").is_fatal());
        assert!(!ErrorRecord::none().is_error());
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(ErrorKind::InputError.http_status_code(), 400);
        assert_eq!(ErrorKind::PathError.http_status_code(), 404);
        assert_eq!(ErrorKind::ProcessingError.http_status_code(), 500);
        assert_eq!(ErrorKind::ZeroCoordinates.http_status_code(), 200);
    }
}
