//! Manual SEG-Y header extraction.
//!
//! This crate reads SEG-Y files without a full-featured SEG-Y library:
//! - Big-endian field decoding (int16/uint16/int32/uint32, IBM and IEEE floats)
//! - Field mapping resolution from caller byte positions and format tokens
//! - Trace geometry from file size and declared sample count
//! - First/last trace extraction with zero-coordinate diagnostics
//! - Stride sampling of source coordinates
//!
//! # Example
//!
//! ```no_run
//! use segy_parser::{extract, ReaderConfig};
//! use std::path::Path;
//!
//! let config = ReaderConfig::standard()?;
//! let result = extract(Path::new("line_001.sgy"), &config);
//! println!("{}", serde_json::to_string_pretty(&result)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod decoder;
pub mod error;
pub mod fields;
pub mod fingerprint;
pub mod geometry;
pub mod headers;
pub mod naming;
pub mod reader;
pub mod result;
pub mod sampling;

pub use decoder::{decode, f64_to_ibm, ibm_to_f64, DecodeError, Encoding};
pub use error::{SegyError, SegyResult};
pub use fields::{
    resolve, CoordinateConfig, CoordinateOverrides, FieldMappingTable, FieldNameMode,
    FormatFamily, FormatPolicy, FormatToken, HeaderFieldSpec, ResolvedFields, ResolverInput,
    DEFAULT_HEADER_BYTES,
};
pub use fingerprint::{fingerprint, Fingerprint};
pub use geometry::FileGeometry;
pub use headers::{read_binary_header, read_text_header, BinaryHeader, SampleFormat, TextHeader};
pub use naming::{clean_file_name, FileNames};
pub use reader::{classify_zero_coordinates, extract, ReaderConfig, ScanMode, SegyReader};
pub use result::{ExtractionRecord, ExtractionResult, FieldMappingsUsed};
pub use sampling::{dedup_and_filter, sample_coordinates, CoordinateSample, SamplingOptions};
