//! Common types shared across the seismic extraction workspace.

pub mod error;
pub mod value;

pub use error::{ErrorKind, ErrorRecord, UnknownErrorKind};
pub use value::FieldValue;
