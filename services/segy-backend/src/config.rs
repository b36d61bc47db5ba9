//! Backend configuration.

use std::path::PathBuf;

use extraction::{ExtractionLimits, DEFAULT_BATCH_OUTPUT};

#[derive(Debug, Clone, PartialEq)]
pub struct BackendConfig {
    /// Audit file rewritten by every batch run.
    pub batch_output: PathBuf,
    pub limits: ExtractionLimits,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            batch_output: PathBuf::from(DEFAULT_BATCH_OUTPUT),
            limits: ExtractionLimits::unlimited(),
        }
    }
}
