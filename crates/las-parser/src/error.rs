//! Error types for LAS parsing.

use seismic_common::{ErrorKind, ErrorRecord};
use thiserror::Error;

/// Result type for LAS parser operations.
pub type LasResult<T> = Result<T, LasError>;

#[derive(Error, Debug)]
pub enum LasError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("LAS file not found: {0}")]
    NotFound(String),

    #[error("Line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Missing required section: {0}")]
    MissingSection(&'static str),
}

impl LasError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        LasError::Parse {
            line,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LasError::NotFound(_) => ErrorKind::PathError,
            _ => ErrorKind::ProcessingError,
        }
    }

    pub fn to_record(&self) -> ErrorRecord {
        ErrorRecord::new(self.kind(), self.to_string())
    }
}
