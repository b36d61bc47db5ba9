//! Source spatial reference selection and the built-in SRID table.

use serde::Serialize;

use crate::error::{ProjectionError, ProjectionResult};

/// Anguilla 1957 / British West Indies Grid.
pub const BWI_GRID_SRID: u32 = 2000;

/// Where a set of projected coordinates comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceReference {
    Srid(u32),
    Proj(String),
}

impl SourceReference {
    /// A PROJ string wins when it starts with `+proj=`; otherwise the SRID.
    pub fn select(srid: Option<u32>, proj: Option<&str>) -> ProjectionResult<Self> {
        if let Some(proj) = proj.map(str::trim).filter(|p| p.starts_with("+proj=")) {
            return Ok(Self::Proj(proj.to_string()));
        }
        srid.map(Self::Srid).ok_or(ProjectionError::MissingReference)
    }

    /// The PROJ definition for this reference.
    pub fn definition(&self) -> ProjectionResult<String> {
        match self {
            Self::Proj(proj) => Ok(proj.clone()),
            Self::Srid(srid) => srid_definition(*srid).ok_or(ProjectionError::UnsupportedSrid(*srid)),
        }
    }
}

impl std::fmt::Display for SourceReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Srid(srid) => write!(f, "EPSG:{}", srid),
            Self::Proj(proj) => f.write_str(proj),
        }
    }
}

/// PROJ definition of a built-in SRID.
pub fn srid_definition(srid: u32) -> Option<String> {
    match srid {
        4326 => Some("+proj=longlat +datum=WGS84 +no_defs".to_string()),
        3857 => Some(
            "+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=0 +x_0=0 +y_0=0 +k=1 +units=m +no_defs".to_string(),
        ),
        BWI_GRID_SRID => Some(
            "+proj=tmerc +lat_0=0 +lon_0=-62 +k=0.9995 +x_0=400000 +y_0=0 +ellps=clrk80 +units=m +no_defs".to_string(),
        ),
        32601..=32660 => Some(format!("+proj=utm +zone={} +datum=WGS84 +units=m +no_defs", srid - 32600)),
        32701..=32760 => Some(format!(
            "+proj=utm +zone={} +south +datum=WGS84 +units=m +no_defs",
            srid - 32700
        )),
        26901..=26923 => Some(format!("+proj=utm +zone={} +ellps=GRS80 +units=m +no_defs", srid - 26900)),
        _ => None,
    }
}
