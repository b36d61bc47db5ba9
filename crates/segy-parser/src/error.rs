//! Error types for SEG-Y extraction.

use seismic_common::{ErrorKind, ErrorRecord};
use thiserror::Error;

use crate::decoder::DecodeError;

/// Result type for SEG-Y parser operations.
pub type SegyResult<T> = Result<T, SegyError>;

/// Errors that abort a file-level operation.
///
/// Field-level decode failures are not represented here; they degrade to
/// an absent value for that field.
#[derive(Error, Debug)]
pub enum SegyError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File too small for SEG-Y headers: {size} bytes (need at least {required})")]
    FileTooSmall { size: u64, required: u64 },

    #[error("Invalid field configuration: {0}")]
    FieldConfig(String),

    #[error("Decode failed for {field}: {source}")]
    Decode {
        field: String,
        #[source]
        source: DecodeError,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Limit exceeded: {0}")]
    LimitExceeded(String),
}

impl SegyError {
    /// Error taxonomy entry for this failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SegyError::InvalidArgument(_) => ErrorKind::InputError,
            _ => ErrorKind::ProcessingError,
        }
    }

    pub fn to_record(&self) -> ErrorRecord {
        ErrorRecord::new(self.kind(), self.to_string())
    }
}
