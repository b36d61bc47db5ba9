//! Source spatial references and inverse projection to WGS84.
//!
//! Survey coordinates arrive either as an SRID from the built-in table or
//! as a PROJ-style definition string. Transverse Mercator (including UTM),
//! Mercator and geographic references are supported.
//!
//! ```
//! use projection::{SourceReference, Transformer};
//!
//! let reference = SourceReference::select(Some(32620), None).unwrap();
//! let transformer = Transformer::from_reference(&reference).unwrap();
//! let lonlat = transformer.to_wgs84(&[(500_000.0, 0.0)]);
//! assert!((lonlat[0].0 + 63.0).abs() < 1e-9);
//! ```

pub mod crs;
pub mod ellipsoid;
pub mod error;
pub mod mercator;
pub mod params;
pub mod transform;
pub mod transverse_mercator;

pub use crs::{srid_definition, SourceReference, BWI_GRID_SRID};
pub use ellipsoid::Ellipsoid;
pub use error::{ProjectionError, ProjectionResult};
pub use mercator::Mercator;
pub use params::{ProjKind, ProjParams};
pub use transform::Transformer;
pub use transverse_mercator::TransverseMercator;
