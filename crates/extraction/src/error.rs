//! Error types for request-level extraction.

use las_parser::LasError;
use projection::ProjectionError;
use segy_parser::SegyError;
use seismic_common::{ErrorKind, ErrorRecord};
use thiserror::Error;

/// Errors surfaced to service callers as `{type, message}` records.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("{0}")]
    Input(String),

    #[error("{0}")]
    Path(String),

    #[error("Limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("No valid coordinates found in SEG-Y file")]
    NoCoordinates,

    #[error(transparent)]
    Segy(#[from] SegyError),

    #[error(transparent)]
    Las(#[from] LasError),

    #[error("Coordinate conversion failed: {0}")]
    Projection(#[from] ProjectionError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl ExtractionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExtractionError::Input(_) | ExtractionError::Projection(_) => ErrorKind::InputError,
            ExtractionError::Path(_) => ErrorKind::PathError,
            ExtractionError::Segy(e) => e.kind(),
            ExtractionError::Las(e) => e.kind(),
            _ => ErrorKind::ProcessingError,
        }
    }

    pub fn to_record(&self) -> ErrorRecord {
        ErrorRecord::new(self.kind(), self.to_string())
    }
}

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;
