//! Inverse projection of source coordinates to WGS84 longitude/latitude.

use tracing::debug;

use crate::crs::SourceReference;
use crate::error::ProjectionResult;
use crate::mercator::Mercator;
use crate::params::{ProjKind, ProjParams};
use crate::transverse_mercator::TransverseMercator;

#[derive(Debug, Clone, PartialEq)]
enum Projection {
    LongLat,
    TransverseMercator(TransverseMercator),
    Mercator(Mercator),
}

/// Converts projected coordinates in a source reference to `(lon, lat)`
/// degrees. Datum shifts are not applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Transformer {
    projection: Projection,
    to_meter: f64,
}

impl Transformer {
    pub fn from_params(params: &ProjParams) -> Self {
        let projection = match params.kind {
            ProjKind::LongLat => Projection::LongLat,
            ProjKind::TransverseMercator => Projection::TransverseMercator(TransverseMercator::new(
                params.ellipsoid,
                params.lat_0,
                params.lon_0,
                params.k_0,
                params.x_0,
                params.y_0,
            )),
            ProjKind::Mercator => Projection::Mercator(Mercator::new(
                params.ellipsoid,
                params.lon_0,
                params.lat_ts,
                params.k_0,
                params.x_0,
                params.y_0,
            )),
        };
        Self {
            projection,
            to_meter: params.to_meter,
        }
    }

    pub fn from_reference(reference: &SourceReference) -> ProjectionResult<Self> {
        let definition = reference.definition()?;
        let params = ProjParams::parse(&definition)?;
        debug!(reference = %reference, kind = ?params.kind, "Built coordinate transformer");
        Ok(Self::from_params(&params))
    }

    /// Inverse-project one point.
    pub fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        match &self.projection {
            Projection::LongLat => (x, y),
            Projection::TransverseMercator(tm) => tm.inverse(x * self.to_meter, y * self.to_meter),
            Projection::Mercator(m) => m.inverse(x * self.to_meter, y * self.to_meter),
        }
    }

    /// Project geographic coordinates into the source reference.
    pub fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        let (x, y) = match &self.projection {
            Projection::LongLat => return (lon, lat),
            Projection::TransverseMercator(tm) => tm.forward(lon, lat),
            Projection::Mercator(m) => m.forward(lon, lat),
        };
        (x / self.to_meter, y / self.to_meter)
    }

    pub fn to_wgs84(&self, points: &[(f64, f64)]) -> Vec<(f64, f64)> {
        points.iter().map(|&(x, y)| self.inverse(x, y)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::assert_coords_approx_eq;
    use test_utils::fixtures::projection::{SNYDER_TM_LONLAT, SNYDER_TM_PROJ, SNYDER_TM_XY};

    #[test]
    fn test_proj_string_reference() {
        let t = Transformer::from_reference(&SourceReference::Proj(SNYDER_TM_PROJ.to_string())).unwrap();
        let out = t.to_wgs84(&[SNYDER_TM_XY]);
        assert_eq!(out.len(), 1);
        assert_coords_approx_eq!(out[0], SNYDER_TM_LONLAT, 1e-5);
    }

    #[test]
    fn test_utm_zone_20_false_easting() {
        let t = Transformer::from_reference(&SourceReference::Srid(32620)).unwrap();
        assert_coords_approx_eq!(t.inverse(500_000.0, 0.0), (-63.0, 0.0), 1e-9);
    }

    #[test]
    fn test_bwi_grid_round_trip() {
        let t = Transformer::from_reference(&SourceReference::Srid(2000)).unwrap();
        let (x, y) = t.forward(-63.05, 18.22);
        assert!((x - 400_000.0).abs() < 150_000.0);
        assert_coords_approx_eq!(t.inverse(x, y), (-63.05, 18.22), 1e-7);
    }

    #[test]
    fn test_feet_units() {
        let metres = Transformer::from_reference(&SourceReference::Proj(
            "+proj=tmerc +lon_0=-75 +k=0.9996 +ellps=clrk66".to_string(),
        ))
        .unwrap();
        let feet = Transformer::from_reference(&SourceReference::Proj(
            "+proj=tmerc +lon_0=-75 +k=0.9996 +ellps=clrk66 +units=ft".to_string(),
        ))
        .unwrap();
        let (x, y) = SNYDER_TM_XY;
        assert_coords_approx_eq!(feet.inverse(x / 0.3048, y / 0.3048), metres.inverse(x, y), 1e-9);
    }

    #[test]
    fn test_longlat_identity_and_errors() {
        let t = Transformer::from_reference(&SourceReference::Srid(4326)).unwrap();
        assert_eq!(t.to_wgs84(&[(-62.0, 18.0)]), vec![(-62.0, 18.0)]);
        assert!(Transformer::from_reference(&SourceReference::Srid(1)).is_err());
        assert!(Transformer::from_reference(&SourceReference::Proj("+proj=lcc".to_string())).is_err());
    }
}
