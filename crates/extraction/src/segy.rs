//! SEG-Y extraction entry points: single file, batch and folder.

use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};
use walkdir::WalkDir;

use segy_parser::{
    extract, read_binary_header, read_text_header, BinaryHeader, ExtractionResult, ReaderConfig,
    SegyReader, TextHeader,
};
use seismic_common::{ErrorKind, ErrorRecord};

use crate::config::ExtractionLimits;
use crate::error::{ExtractionError, Result};
use crate::paths::{is_segy_path, validate_segy_path};
use crate::request::{BatchRequest, ExtractionRequest};

/// One batch result: an extraction, or a rejection before the file was read.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BatchEntry {
    Extracted(ExtractionResult),
    Rejected { error: ErrorRecord },
}

impl BatchEntry {
    pub fn rejected(error: &ExtractionError) -> Self {
        BatchEntry::Rejected {
            error: error.to_record(),
        }
    }

    pub fn error(&self) -> &ErrorRecord {
        match self {
            BatchEntry::Extracted(result) => result.error(),
            BatchEntry::Rejected { error } => error,
        }
    }
}

/// Extract with an already-resolved configuration.
pub fn extract_with_config(path: &Path, config: &ReaderConfig, limits: &ExtractionLimits) -> ExtractionResult {
    if let Err(e) = validate_segy_path(path) {
        return ExtractionResult::failed(path, e.to_record());
    }
    extract_validated(path, config, limits)
}

fn extract_validated(path: &Path, config: &ReaderConfig, limits: &ExtractionLimits) -> ExtractionResult {
    if let Err(e) = check_limits(path, limits) {
        warn!(file = %path.display(), error = %e, "Skipping file over limits");
        return ExtractionResult::failed(path, e.to_record());
    }
    extract(path, config)
}

fn check_limits(path: &Path, limits: &ExtractionLimits) -> Result<()> {
    limits.check_file_size(path)?;
    if limits.max_trace_count.is_some() {
        let reader = SegyReader::open(path)?;
        limits.check_geometry(reader.geometry())?;
    }
    Ok(())
}

/// A resolved configuration, or the record every file gets when the
/// field configuration cannot be applied.
type FileConfig = std::result::Result<ReaderConfig, ErrorRecord>;

/// Request-shape errors abort; width and encoding conflicts are reported
/// per file.
fn resolve_for_files(request: &ExtractionRequest) -> Result<FileConfig> {
    match request.reader_config() {
        Ok(config) => Ok(Ok(config)),
        Err(e) if e.kind() == ErrorKind::InputError => Err(e),
        Err(e) => {
            warn!(error = %e, "Field configuration cannot be applied");
            Ok(Err(e.to_record()))
        }
    }
}

fn extract_resolved(path: &Path, config: &FileConfig, limits: &ExtractionLimits) -> ExtractionResult {
    match config {
        Ok(config) => extract_validated(path, config, limits),
        Err(record) => ExtractionResult::failed(path, record.clone()),
    }
}

pub fn extract_file(path: &Path, request: &ExtractionRequest, limits: &ExtractionLimits) -> ExtractionResult {
    if let Err(e) = validate_segy_path(path) {
        return ExtractionResult::failed(path, e.to_record());
    }
    match request.reader_config() {
        Ok(config) => extract_validated(path, &config, limits),
        Err(e) => ExtractionResult::failed(path, e.to_record()),
    }
}

/// Run a batch. A request without `files`, or with non-positive
/// `field_mappings`, aborts the whole batch; every other failure stays in
/// its own entry.
pub fn run_batch(batch: &BatchRequest, limits: &ExtractionLimits) -> Result<BTreeMap<String, BatchEntry>> {
    let files = batch
        .files
        .as_ref()
        .ok_or_else(|| ExtractionError::Input("Input must contain 'files' array".to_string()))?;
    let config = resolve_for_files(&batch.request)?;

    let entries: Vec<(String, BatchEntry)> = files
        .par_iter()
        .map(|file| {
            let key = file.key();
            let entry = match file.file_path.as_deref() {
                None | Some("") => BatchEntry::rejected(&ExtractionError::Input("Missing filePath".to_string())),
                Some(path) => {
                    let path = Path::new(path);
                    match validate_segy_path(path) {
                        Err(e) => BatchEntry::rejected(&e),
                        Ok(()) => BatchEntry::Extracted(extract_resolved(path, &config, limits)),
                    }
                }
            };
            (key, entry)
        })
        .collect();

    let failures = entries.iter().filter(|(_, e)| e.error().kind.is_some_and(|k| k.is_fatal())).count();
    info!(files = entries.len(), failures, "Batch extraction complete");

    // Later duplicates of an index replace earlier ones.
    Ok(entries.into_iter().collect())
}

/// Overwrite the batch audit file, creating parent directories.
pub fn write_batch_output<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Every SEG-Y file directly inside `dir`, sorted by file name.
pub fn extract_folder(dir: &Path, request: &ExtractionRequest, limits: &ExtractionLimits) -> Result<Vec<ExtractionResult>> {
    if !dir.is_dir() {
        return Err(ExtractionError::Path(format!("Folder not found: {}", dir.display())));
    }
    let config = resolve_for_files(request)?;

    let mut paths = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| ExtractionError::Other(e.into()))?;
        if entry.file_type().is_file() && is_segy_path(entry.path()) {
            paths.push(entry.into_path());
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    info!(folder = %dir.display(), files = paths.len(), "Extracting SEG-Y folder");
    Ok(paths
        .par_iter()
        .map(|path| extract_resolved(path, &config, limits))
        .collect())
}

pub fn text_header(path: &Path) -> Result<TextHeader> {
    validate_segy_path(path)?;
    Ok(read_text_header(path)?)
}

pub fn binary_header(path: &Path) -> Result<BinaryHeader> {
    validate_segy_path(path)?;
    Ok(read_binary_header(path)?)
}
