//! Error types for projection setup.

use thiserror::Error;

pub type ProjectionResult<T> = Result<T, ProjectionError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    #[error("No spatial reference given: provide an SRID or a +proj= string")]
    MissingReference,

    #[error("Unsupported SRID: {0}")]
    UnsupportedSrid(u32),

    #[error("Invalid PROJ string: {0}")]
    InvalidProjString(String),

    #[error("Unsupported projection: {0}")]
    UnsupportedProjection(String),

    #[error("Unknown ellipsoid: {0}")]
    UnknownEllipsoid(String),

    #[error("Invalid value for +{name}: {value}")]
    InvalidParameter { name: String, value: String },
}
