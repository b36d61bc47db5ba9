//! LAS well-log parsing and well metadata.
//!
//! [`LasFile`] parses the `~V`, `~W`, `~C`, `~P`, `~O` and `~A` sections
//! of a LAS 2.0 file. The [`metadata`] module turns a parsed file into the
//! normalised records returned by the services.

pub mod error;
pub mod metadata;
pub mod parser;

pub use error::{LasError, LasResult};
pub use metadata::{
    build_well_report, extract_metadata, summary, validate_depth_step, well_report, FileStat,
    LasMetadata, LasSummary, WellReport, WellReportResult,
};
pub use parser::{HeaderItem, LasFile};
