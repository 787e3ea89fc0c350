//! Great-circle distance and bearing between geographic coordinates.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in km (IUGG).
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// A geographic coordinate in degrees.
#[derive(Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new coordinate.
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns a copy rounded to 6 decimal places, the display precision
    /// of polyline6 geometry.
    pub fn rounded(&self) -> Self {
        Self {
            lat: round6(self.lat),
            lng: round6(self.lng),
        }
    }

    /// Linearly interpolates between two coordinates.
    pub fn lerp(&self, other: &LatLng, t: f64) -> Self {
        Self {
            lat: self.lat + (other.lat - self.lat) * t,
            lng: self.lng + (other.lng - self.lng) * t,
        }
    }
}

impl std::fmt::Debug for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LatLng({}, {})", self.lat, self.lng)
    }
}

/// Rounds a value to 6 decimal places.
pub(crate) fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

/// Computes the great-circle distance between two coordinates in km,
/// using the haversine formula.
pub fn haversine_km(a: LatLng, b: LatLng) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Computes the forward azimuth from `a` to `b` in degrees, in `[0, 360)`.
///
/// The bearing of a point to itself is not meaningful; callers are expected
/// to avoid that case.
pub fn bearing_deg(a: LatLng, b: LatLng) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let d_lambda = (b.lng - a.lng).to_radians();

    let x = d_lambda.sin() * phi2.cos();
    let y = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lambda.cos();
    (x.atan2(y).to_degrees() + 360.0) % 360.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn haversine_is_symmetric() {
        let pairs = [
            (LatLng::new(23.8103, 90.4125), LatLng::new(23.7330, 90.4172)),
            (LatLng::new(0.0, 0.0), LatLng::new(0.0, 1.0)),
            (LatLng::new(-33.86, 151.21), LatLng::new(51.5, -0.13)),
        ];
        for (a, b) in pairs {
            assert_approx_eq!(haversine_km(a, b), haversine_km(b, a), 1e-9);
        }
    }

    #[test]
    fn haversine_of_identical_points_is_zero() {
        let p = LatLng::new(23.8103, 90.4125);
        assert_approx_eq!(haversine_km(p, p), 0.0, 1e-12);
    }

    #[test]
    fn haversine_satisfies_triangle_inequality() {
        let a = LatLng::new(23.81, 90.41);
        let b = LatLng::new(23.75, 90.39);
        let c = LatLng::new(23.70, 90.45);
        assert!(haversine_km(a, c) <= haversine_km(a, b) + haversine_km(b, c) + 1e-9);
    }

    #[test]
    fn one_degree_of_longitude_at_equator() {
        let a = LatLng::new(0.0, 0.0);
        let b = LatLng::new(0.0, 1.0);
        // 2π·R / 360
        assert_approx_eq!(haversine_km(a, b), 111.195, 1e-2);
    }

    #[test]
    fn bearing_cardinal_directions() {
        let origin = LatLng::new(0.0, 0.0);
        assert_approx_eq!(bearing_deg(origin, LatLng::new(1.0, 0.0)), 0.0, 1e-9);
        assert_approx_eq!(bearing_deg(origin, LatLng::new(0.0, 1.0)), 90.0, 1e-9);
        assert_approx_eq!(bearing_deg(origin, LatLng::new(-1.0, 0.0)), 180.0, 1e-9);
        assert_approx_eq!(bearing_deg(origin, LatLng::new(0.0, -1.0)), 270.0, 1e-9);
    }

    #[test]
    fn rounding_keeps_six_decimals() {
        let p = LatLng::new(23.810312345678, 90.412598765432);
        let r = p.rounded();
        assert_approx_eq!(r.lat, 23.810312, 1e-9);
        assert_approx_eq!(r.lng, 90.412599, 1e-9);
    }
}
