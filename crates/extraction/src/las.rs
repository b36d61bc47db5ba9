//! LAS well-log services.

use serde::Serialize;
use std::path::Path;
use tracing::debug;

use las_parser::{FileStat, LasFile, LasMetadata, LasSummary, WellReportResult};

use crate::error::Result;
use crate::paths::validate_las_path;

fn load(path: &Path) -> Result<(LasFile, FileStat)> {
    validate_las_path(path)?;
    let las = LasFile::read(path)?;
    let stat = FileStat::from_path(path)?;
    debug!(file = %path.display(), curves = las.curves.len(), rows = las.data.len(), "Parsed LAS file");
    Ok((las, stat))
}

pub fn extract_metadata(path: &Path) -> Result<LasMetadata> {
    let (las, stat) = load(path)?;
    Ok(las_parser::extract_metadata(&las, &stat))
}

pub fn summary(path: &Path) -> Result<LasSummary> {
    let (las, stat) = load(path)?;
    Ok(las_parser::summary(&las, &stat))
}

/// Failures are reported inside the result (`success: false`).
pub fn report(path: &Path) -> WellReportResult {
    las_parser::well_report(path)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LasStatus {
    pub available: bool,
    pub error: Option<String>,
    pub parser: &'static str,
    pub version: &'static str,
}

pub fn status() -> LasStatus {
    LasStatus {
        available: true,
        error: None,
        parser: "las-parser",
        version: env!("CARGO_PKG_VERSION"),
    }
}
