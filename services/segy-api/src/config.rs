//! Service configuration.

use std::path::PathBuf;

use extraction::{ExtractionLimits, DEFAULT_BATCH_OUTPUT};

#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    /// Used by `segy_manual_read` when the request names no file.
    pub default_segy_file: Option<PathBuf>,
    /// Audit file rewritten after every batch request.
    pub batch_output: PathBuf,
    pub limits: ExtractionLimits,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            default_segy_file: None,
            batch_output: PathBuf::from(DEFAULT_BATCH_OUTPUT),
            limits: ExtractionLimits::unlimited(),
        }
    }
}
