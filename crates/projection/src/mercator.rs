//! Normal-aspect Mercator, ellipsoidal or spherical.

use std::f64::consts::FRAC_PI_2;

use crate::ellipsoid::Ellipsoid;

const MAX_ITERATIONS: usize = 15;
const TOLERANCE: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq)]
pub struct Mercator {
    a: f64,
    e: f64,
    k_0: f64,
    lon_0: f64,
    x_0: f64,
    y_0: f64,
}

impl Mercator {
    /// `lat_ts` (true-scale latitude) overrides `k_0` when non-zero.
    pub fn new(ellipsoid: Ellipsoid, lon_0: f64, lat_ts: f64, k_0: f64, x_0: f64, y_0: f64) -> Self {
        let e2 = ellipsoid.e2();
        let k_0 = if lat_ts != 0.0 {
            let (sin_ts, cos_ts) = lat_ts.to_radians().sin_cos();
            cos_ts / (1.0 - e2 * sin_ts * sin_ts).sqrt()
        } else {
            k_0
        };
        Self {
            a: ellipsoid.a,
            e: e2.sqrt(),
            k_0,
            lon_0: lon_0.to_radians(),
            x_0,
            y_0,
        }
    }

    pub fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        let phi = lat.to_radians();
        let ak = self.a * self.k_0;
        let x = ak * (lon.to_radians() - self.lon_0);
        let es = self.e * phi.sin();
        let y = ak * ((FRAC_PI_2 / 2.0 + phi / 2.0).tan() * ((1.0 - es) / (1.0 + es)).powf(self.e / 2.0)).ln();
        (x + self.x_0, y + self.y_0)
    }

    pub fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let ak = self.a * self.k_0;
        let t = (-(y - self.y_0) / ak).exp();
        let mut phi = FRAC_PI_2 - 2.0 * t.atan();
        if self.e > 0.0 {
            for _ in 0..MAX_ITERATIONS {
                let es = self.e * phi.sin();
                let next = FRAC_PI_2 - 2.0 * (t * ((1.0 - es) / (1.0 + es)).powf(self.e / 2.0)).atan();
                let done = (next - phi).abs() < TOLERANCE;
                phi = next;
                if done {
                    break;
                }
            }
        }
        let lambda = (x - self.x_0) / ak + self.lon_0;
        (lambda.to_degrees(), phi.to_degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{assert_approx_eq, assert_coords_approx_eq};

    fn web_mercator() -> Mercator {
        Mercator::new(Ellipsoid::sphere(6_378_137.0), 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    #[test]
    fn test_web_mercator_known_values() {
        let (x, y) = web_mercator().forward(10.0, 0.0);
        assert_approx_eq!(x, 1_113_194.907_932_735_7, 1e-6);
        assert_approx_eq!(y, 0.0, 1e-6);
        let (_, y) = web_mercator().forward(0.0, 45.0);
        assert_approx_eq!(y, 5_621_521.486_192_066, 1e-4);
    }

    #[test]
    fn test_round_trips() {
        let ellipsoidal = Mercator::new(Ellipsoid::WGS84, 0.0, 0.0, 1.0, 0.0, 0.0);
        for m in [web_mercator(), ellipsoidal] {
            for &(lon, lat) in &[(-62.5, 18.0), (120.0, -33.9), (0.0, 70.0)] {
                let (x, y) = m.forward(lon, lat);
                assert_coords_approx_eq!(m.inverse(x, y), (lon, lat), 1e-9);
            }
        }
    }

    #[test]
    fn test_true_scale_latitude() {
        let m = Mercator::new(Ellipsoid::sphere(1.0), 0.0, 60.0, 1.0, 0.0, 0.0);
        let (x, _) = m.forward(1.0_f64.to_degrees(), 0.0);
        assert_approx_eq!(x, 0.5, 1e-12);
    }
}
