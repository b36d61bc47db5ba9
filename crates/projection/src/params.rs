//! PROJ-style parameter strings.
//!
//! Supports the subset needed for survey coordinate references:
//! `+proj=tmerc|utm|merc|longlat` with ellipsoid, origin, scale, false
//! easting/northing and unit parameters. Datum shifts are not applied.

use tracing::debug;

use crate::ellipsoid::Ellipsoid;
use crate::error::{ProjectionError, ProjectionResult};

const US_SURVEY_FOOT: f64 = 1200.0 / 3937.0;
const INTERNATIONAL_FOOT: f64 = 0.3048;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjKind {
    LongLat,
    TransverseMercator,
    Mercator,
}

/// Parsed projection definition. Angles are in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjParams {
    pub kind: ProjKind,
    pub ellipsoid: Ellipsoid,
    pub lat_0: f64,
    pub lon_0: f64,
    pub lat_ts: f64,
    pub k_0: f64,
    pub x_0: f64,
    pub y_0: f64,
    /// Multiplier from projected units to metres.
    pub to_meter: f64,
}

impl ProjParams {
    pub fn parse(definition: &str) -> ProjectionResult<Self> {
        let mut proj: Option<String> = None;
        let mut ellps: Option<Ellipsoid> = None;
        let mut a: Option<f64> = None;
        let mut b: Option<f64> = None;
        let mut rf: Option<f64> = None;
        let mut radius: Option<f64> = None;
        let mut lat_0 = 0.0;
        let mut lon_0: Option<f64> = None;
        let mut lat_ts = 0.0;
        let mut k_0: Option<f64> = None;
        let mut x_0: Option<f64> = None;
        let mut y_0: Option<f64> = None;
        let mut zone: Option<u32> = None;
        let mut south = false;
        let mut to_meter = 1.0;

        for token in definition.split_whitespace() {
            let Some(body) = token.strip_prefix('+') else {
                return Err(ProjectionError::InvalidProjString(format!(
                    "expected +key[=value], got '{}'",
                    token
                )));
            };
            let (key, value) = match body.split_once('=') {
                Some((k, v)) => (k, Some(v)),
                None => (body, None),
            };

            match key {
                "proj" => proj = Some(required(key, value)?.to_string()),
                "ellps" => ellps = Some(Ellipsoid::from_name(required(key, value)?)?),
                "datum" => {
                    ellps = Some(match required(key, value)? {
                        "WGS84" => Ellipsoid::WGS84,
                        "NAD83" => Ellipsoid::GRS80,
                        "NAD27" => Ellipsoid::CLARKE_1866,
                        other => return Err(ProjectionError::UnknownEllipsoid(other.to_string())),
                    })
                }
                "a" => a = Some(number(key, value)?),
                "b" => b = Some(number(key, value)?),
                "rf" => rf = Some(number(key, value)?),
                "R" => radius = Some(number(key, value)?),
                "lat_0" => lat_0 = number(key, value)?,
                "lon_0" => lon_0 = Some(number(key, value)?),
                "lat_ts" => lat_ts = number(key, value)?,
                "k" | "k_0" => k_0 = Some(number(key, value)?),
                "x_0" => x_0 = Some(number(key, value)?),
                "y_0" => y_0 = Some(number(key, value)?),
                "zone" => {
                    let raw = required(key, value)?;
                    let z: u32 = raw.parse().map_err(|_| invalid(key, raw))?;
                    if !(1..=60).contains(&z) {
                        return Err(invalid(key, raw));
                    }
                    zone = Some(z);
                }
                "south" => south = true,
                "units" => {
                    to_meter = match required(key, value)? {
                        "m" => 1.0,
                        "km" => 1000.0,
                        "ft" => INTERNATIONAL_FOOT,
                        "us-ft" => US_SURVEY_FOOT,
                        other => return Err(invalid(key, other)),
                    }
                }
                "to_meter" => to_meter = number(key, value)?,
                other => debug!(parameter = %other, "Ignoring PROJ parameter"),
            }
        }

        let ellipsoid = match (radius, a, b, rf) {
            (Some(r), ..) => Ellipsoid::sphere(r),
            (None, Some(a), Some(b), _) => Ellipsoid::from_axes(a, b),
            (None, Some(a), None, Some(rf)) => Ellipsoid::from_inverse_flattening(a, rf),
            (None, Some(a), None, None) => Ellipsoid {
                a,
                f: ellps.map_or(0.0, |e| e.f),
            },
            _ => ellps.unwrap_or(Ellipsoid::WGS84),
        };

        let proj = proj.ok_or_else(|| {
            ProjectionError::InvalidProjString("missing +proj parameter".to_string())
        })?;

        let params = match proj.as_str() {
            "longlat" | "latlong" | "lonlat" | "latlon" => ProjParams {
                kind: ProjKind::LongLat,
                ellipsoid,
                lat_0,
                lon_0: lon_0.unwrap_or(0.0),
                lat_ts,
                k_0: 1.0,
                x_0: 0.0,
                y_0: 0.0,
                to_meter: 1.0,
            },
            "tmerc" => ProjParams {
                kind: ProjKind::TransverseMercator,
                ellipsoid,
                lat_0,
                lon_0: lon_0.unwrap_or(0.0),
                lat_ts,
                k_0: k_0.unwrap_or(1.0),
                x_0: x_0.unwrap_or(0.0),
                y_0: y_0.unwrap_or(0.0),
                to_meter,
            },
            "utm" => {
                let zone = zone.ok_or_else(|| {
                    ProjectionError::InvalidProjString("+proj=utm requires +zone".to_string())
                })?;
                ProjParams {
                    kind: ProjKind::TransverseMercator,
                    ellipsoid,
                    lat_0: 0.0,
                    lon_0: utm_central_meridian(zone),
                    lat_ts,
                    k_0: 0.9996,
                    x_0: 500_000.0,
                    y_0: if south { 10_000_000.0 } else { 0.0 },
                    to_meter,
                }
            }
            "merc" => ProjParams {
                kind: ProjKind::Mercator,
                ellipsoid,
                lat_0,
                lon_0: lon_0.unwrap_or(0.0),
                lat_ts,
                k_0: k_0.unwrap_or(1.0),
                x_0: x_0.unwrap_or(0.0),
                y_0: y_0.unwrap_or(0.0),
                to_meter,
            },
            other => return Err(ProjectionError::UnsupportedProjection(other.to_string())),
        };

        Ok(params)
    }
}

/// Central meridian of a UTM zone in degrees.
pub fn utm_central_meridian(zone: u32) -> f64 {
    zone as f64 * 6.0 - 183.0
}

fn required<'a>(key: &str, value: Option<&'a str>) -> ProjectionResult<&'a str> {
    value.ok_or_else(|| invalid(key, ""))
}

fn number(key: &str, value: Option<&str>) -> ProjectionResult<f64> {
    let raw = required(key, value)?;
    raw.parse::<f64>().map_err(|_| invalid(key, raw))
}

fn invalid(key: &str, value: &str) -> ProjectionError {
    ProjectionError::InvalidParameter {
        name: key.to_string(),
        value: value.to_string(),
    }
}
