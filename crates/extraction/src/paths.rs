//! Path checks applied before any file is opened.

use std::path::Path;

use crate::error::{ExtractionError, Result};

const SEGY_EXTENSIONS: &[&str] = &["sgy", "segy"];
const LAS_EXTENSIONS: &[&str] = &["las"];

fn has_extension(path: &Path, accepted: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| accepted.iter().any(|a| ext.eq_ignore_ascii_case(a)))
}

pub fn is_segy_path(path: &Path) -> bool {
    has_extension(path, SEGY_EXTENSIONS)
}

fn validate(path: &Path, accepted: &[&str], kind: &str) -> Result<()> {
    if !path.is_file() {
        return Err(ExtractionError::Path(format!("File not found: {}", path.display())));
    }
    if !has_extension(path, accepted) {
        return Err(ExtractionError::Path(format!("Not a {} file: {}", kind, path.display())));
    }
    Ok(())
}

/// Existing regular file with a `.sgy`/`.segy` extension (any case).
pub fn validate_segy_path(path: &Path) -> Result<()> {
    validate(path, SEGY_EXTENSIONS, "SEG-Y")
}

pub fn validate_las_path(path: &Path) -> Result<()> {
    validate(path, LAS_EXTENSIONS, "LAS")
}
