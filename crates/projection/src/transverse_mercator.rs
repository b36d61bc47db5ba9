//! Ellipsoidal transverse Mercator (Snyder, Map Projections: A Working
//! Manual, USGS PP 1395, eqs. 8-9 to 8-25).

use crate::ellipsoid::Ellipsoid;

#[derive(Debug, Clone, PartialEq)]
pub struct TransverseMercator {
    a: f64,
    e2: f64,
    ep2: f64,
    k_0: f64,
    lon_0: f64,
    m_0: f64,
    x_0: f64,
    y_0: f64,
}

impl TransverseMercator {
    /// Angles in degrees, offsets in metres.
    pub fn new(ellipsoid: Ellipsoid, lat_0: f64, lon_0: f64, k_0: f64, x_0: f64, y_0: f64) -> Self {
        let e2 = ellipsoid.e2();
        let mut tm = Self {
            a: ellipsoid.a,
            e2,
            ep2: ellipsoid.ep2(),
            k_0,
            lon_0: lon_0.to_radians(),
            m_0: 0.0,
            x_0,
            y_0,
        };
        tm.m_0 = tm.meridian_arc(lat_0.to_radians());
        tm
    }

    fn meridian_arc(&self, phi: f64) -> f64 {
        let e2 = self.e2;
        let e4 = e2 * e2;
        let e6 = e4 * e2;
        self.a
            * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
                - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
                + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
                - (35.0 * e6 / 3072.0) * (6.0 * phi).sin())
    }

    /// (lon, lat) degrees to (x, y) metres.
    pub fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        let phi = lat.to_radians();
        let (sin_phi, cos_phi) = phi.sin_cos();
        let tan_phi = phi.tan();

        let n = self.a / (1.0 - self.e2 * sin_phi * sin_phi).sqrt();
        let t = tan_phi * tan_phi;
        let c = self.ep2 * cos_phi * cos_phi;
        let a = (lon.to_radians() - self.lon_0) * cos_phi;
        let m = self.meridian_arc(phi);

        let x = self.k_0
            * n
            * (a + (1.0 - t + c) * a.powi(3) / 6.0
                + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * self.ep2) * a.powi(5) / 120.0);
        let y = self.k_0
            * (m - self.m_0
                + n * tan_phi
                    * (a * a / 2.0
                        + (5.0 - t + 9.0 * c + 4.0 * c * c) * a.powi(4) / 24.0
                        + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * self.ep2) * a.powi(6) / 720.0));

        (x + self.x_0, y + self.y_0)
    }

    /// (x, y) metres to (lon, lat) degrees.
    pub fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let x = x - self.x_0;
        let y = y - self.y_0;
        let e2 = self.e2;
        let e4 = e2 * e2;
        let e6 = e4 * e2;

        let m = self.m_0 + y / self.k_0;
        let mu = m / (self.a * (1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0));
        let root = (1.0 - e2).sqrt();
        let e1 = (1.0 - root) / (1.0 + root);

        let phi1 = mu
            + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
            + (21.0 * e1 * e1 / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
            + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
            + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

        let (sin1, cos1) = phi1.sin_cos();
        let tan1 = phi1.tan();
        let c1 = self.ep2 * cos1 * cos1;
        let t1 = tan1 * tan1;
        let w = 1.0 - e2 * sin1 * sin1;
        let n1 = self.a / w.sqrt();
        let r1 = self.a * (1.0 - e2) / w.powf(1.5);
        let d = x / (n1 * self.k_0);

        let phi = phi1
            - (n1 * tan1 / r1)
                * (d * d / 2.0
                    - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * self.ep2) * d.powi(4) / 24.0
                    + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1 - 252.0 * self.ep2 - 3.0 * c1 * c1)
                        * d.powi(6)
                        / 720.0);
        let lambda = self.lon_0
            + (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
                + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * self.ep2 + 24.0 * t1 * t1) * d.powi(5)
                    / 120.0)
                / cos1;

        (lambda.to_degrees(), phi.to_degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::fixtures::projection::{SNYDER_TM_LONLAT, SNYDER_TM_XY};
    use test_utils::{assert_approx_eq, assert_coords_approx_eq};

    fn snyder() -> TransverseMercator {
        TransverseMercator::new(Ellipsoid::CLARKE_1866, 0.0, -75.0, 0.9996, 0.0, 0.0)
    }

    #[test]
    fn test_snyder_forward() {
        let (x, y) = snyder().forward(SNYDER_TM_LONLAT.0, SNYDER_TM_LONLAT.1);
        assert_approx_eq!(x, SNYDER_TM_XY.0, 1.0);
        assert_approx_eq!(y, SNYDER_TM_XY.1, 1.0);
    }

    #[test]
    fn test_snyder_inverse() {
        let lonlat = snyder().inverse(SNYDER_TM_XY.0, SNYDER_TM_XY.1);
        assert_coords_approx_eq!(lonlat, SNYDER_TM_LONLAT, 1e-5);
    }

    #[test]
    fn test_central_meridian_origin() {
        let tm = TransverseMercator::new(Ellipsoid::WGS84, 0.0, 15.0, 0.9996, 500_000.0, 0.0);
        let (x, y) = tm.forward(15.0, 0.0);
        assert_approx_eq!(x, 500_000.0, 1e-6);
        assert_approx_eq!(y, 0.0, 1e-6);
        let (lon, lat) = tm.inverse(500_000.0, 0.0);
        assert_approx_eq!(lon, 15.0, 1e-9);
        assert_approx_eq!(lat, 0.0, 1e-9);
    }

    #[test]
    fn test_round_trip_with_offsets() {
        let tm = TransverseMercator::new(Ellipsoid::CLARKE_1880, 0.0, -62.0, 0.9995, 400_000.0, 0.0);
        for &(lon, lat) in &[(-63.05, 18.2), (-61.5, 17.1), (-62.0, 12.0)] {
            let (x, y) = tm.forward(lon, lat);
            assert_coords_approx_eq!(tm.inverse(x, y), (lon, lat), 1e-7);
        }
    }
}
