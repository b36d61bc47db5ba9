//! Service-level limits and defaults.

use std::path::Path;

use segy_parser::FileGeometry;

use crate::error::{ExtractionError, Result};

/// Audit file written after every batch run.
pub const DEFAULT_BATCH_OUTPUT: &str = "tmp/segy_extract_by_files.json";

/// Trace stride for coordinate conversion.
pub const DEFAULT_SAMPLE_INTERVAL: u64 = 10;

/// Ceilings checked before a file is extracted. `None` means unlimited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionLimits {
    pub max_file_size_bytes: Option<u64>,
    pub max_trace_count: Option<u64>,
}

impl ExtractionLimits {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn from_options(max_file_size_mb: Option<u64>, max_trace_count: Option<u64>) -> Self {
        Self {
            max_file_size_bytes: max_file_size_mb.map(|mb| mb.saturating_mul(1024 * 1024)),
            max_trace_count,
        }
    }

    pub fn check_file_size(&self, path: &Path) -> Result<()> {
        let Some(max) = self.max_file_size_bytes else {
            return Ok(());
        };
        let size = std::fs::metadata(path)?.len();
        if size > max {
            return Err(ExtractionError::LimitExceeded(format!(
                "file size {} bytes exceeds limit of {} bytes",
                size, max
            )));
        }
        Ok(())
    }

    pub fn check_geometry(&self, geometry: &FileGeometry) -> Result<()> {
        match self.max_trace_count {
            Some(max) if geometry.trace_count > max => Err(ExtractionError::LimitExceeded(format!(
                "trace count {} exceeds limit of {}",
                geometry.trace_count, max
            ))),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_options() {
        let limits = ExtractionLimits::from_options(Some(2), None);
        assert_eq!(limits.max_file_size_bytes, Some(2 * 1024 * 1024));
        assert_eq!(limits.max_trace_count, None);
        assert_eq!(ExtractionLimits::unlimited(), ExtractionLimits::default());
    }

    #[test]
    fn test_trace_count_limit() {
        let geometry = FileGeometry::compute(3600 + 3 * 280, 10u16.to_be_bytes());
        let limits = ExtractionLimits {
            max_trace_count: Some(2),
            ..Default::default()
        };
        let err = limits.check_geometry(&geometry).unwrap_err();
        assert_eq!(err.kind(), seismic_common::ErrorKind::ProcessingError);
        assert!(ExtractionLimits::unlimited().check_geometry(&geometry).is_ok());
    }
}
