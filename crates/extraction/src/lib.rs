//! Request-level extraction shared by the HTTP API and the stdio backend.
//!
//! Callers hand in JSON-shaped requests; this crate validates them, checks
//! paths and limits, and dispatches to the SEG-Y, projection and LAS
//! crates. Every failure comes back as an [`ExtractionError`] that maps to
//! a `{type, message}` record.

pub mod config;
pub mod coordinates;
pub mod error;
pub mod info;
pub mod las;
pub mod paths;
pub mod request;
pub mod segy;

pub use config::{ExtractionLimits, DEFAULT_BATCH_OUTPUT, DEFAULT_SAMPLE_INTERVAL};
pub use coordinates::{
    convert_file, convert_files, ConversionBatch, ConversionEntry, ConversionOptions, ConversionRequest,
    ConversionResult, MultiConversionRequest, DEFAULT_PROJ4,
};
pub use error::{ExtractionError, Result};
pub use info::{file_info, FileInfo};
pub use paths::{validate_las_path, validate_segy_path};
pub use segy_parser::ExtractionResult;
pub use request::{BatchFile, BatchRequest, ExtractionRequest, FormatSpec};
pub use segy::{
    binary_header, extract_file, extract_folder, extract_with_config, run_batch, text_header,
    write_batch_output, BatchEntry,
};
