//! Reference ellipsoids.

use crate::error::{ProjectionError, ProjectionResult};

/// An ellipsoid given by semi-major axis and flattening.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Semi-major axis in metres.
    pub a: f64,
    /// Flattening (0 for a sphere).
    pub f: f64,
}

impl Ellipsoid {
    pub const WGS84: Ellipsoid = Ellipsoid {
        a: 6_378_137.0,
        f: 1.0 / 298.257_223_563,
    };
    pub const GRS80: Ellipsoid = Ellipsoid {
        a: 6_378_137.0,
        f: 1.0 / 298.257_222_101,
    };
    pub const INTERNATIONAL: Ellipsoid = Ellipsoid {
        a: 6_378_388.0,
        f: 1.0 / 297.0,
    };
    pub const CLARKE_1880: Ellipsoid = Ellipsoid {
        a: 6_378_249.145,
        f: 1.0 / 293.4663,
    };
    pub const BESSEL: Ellipsoid = Ellipsoid {
        a: 6_377_397.155,
        f: 1.0 / 299.152_812_8,
    };
    pub const KRASSOWSKY: Ellipsoid = Ellipsoid {
        a: 6_378_245.0,
        f: 1.0 / 298.3,
    };
    /// Clarke 1866 is defined by its axes.
    pub const CLARKE_1866: Ellipsoid = Ellipsoid {
        a: 6_378_206.4,
        f: (6_378_206.4 - 6_356_583.8) / 6_378_206.4,
    };

    pub fn from_inverse_flattening(a: f64, rf: f64) -> Self {
        Self { a, f: 1.0 / rf }
    }

    pub fn sphere(radius: f64) -> Self {
        Self { a: radius, f: 0.0 }
    }

    pub fn from_axes(a: f64, b: f64) -> Self {
        Self { a, f: (a - b) / a }
    }

    /// Look up a PROJ `+ellps=` name.
    pub fn from_name(name: &str) -> ProjectionResult<Self> {
        match name {
            "WGS84" => Ok(Self::WGS84),
            "GRS80" => Ok(Self::GRS80),
            "intl" => Ok(Self::INTERNATIONAL),
            "clrk66" => Ok(Self::CLARKE_1866),
            "clrk80" | "clrk80ign" => Ok(Self::CLARKE_1880),
            "bessel" => Ok(Self::BESSEL),
            "krass" => Ok(Self::KRASSOWSKY),
            other => Err(ProjectionError::UnknownEllipsoid(other.to_string())),
        }
    }

    /// First eccentricity squared.
    pub fn e2(&self) -> f64 {
        self.f * (2.0 - self.f)
    }

    /// Second eccentricity squared.
    pub fn ep2(&self) -> f64 {
        let e2 = self.e2();
        e2 / (1.0 - e2)
    }
}
