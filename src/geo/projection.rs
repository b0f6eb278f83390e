use std::ops::{Add, Mul, Sub};

use crate::{GeoPoint, EARTH_RADIUS_KM};

/// Point in Earth-centred 3D space, in kilometres.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CartesianPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl CartesianPoint {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn cross(&self, other: &CartesianPoint) -> CartesianPoint {
        CartesianPoint {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Unit vector in the same direction, or `None` for a zero-length vector.
    pub fn normalized(&self) -> Option<CartesianPoint> {
        let len = self.norm();
        if len == 0.0 || !len.is_finite() {
            return None;
        }
        Some(*self * (1.0 / len))
    }
}

impl Add for CartesianPoint {
    type Output = CartesianPoint;

    fn add(self, rhs: CartesianPoint) -> CartesianPoint {
        CartesianPoint::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for CartesianPoint {
    type Output = CartesianPoint;

    fn sub(self, rhs: CartesianPoint) -> CartesianPoint {
        CartesianPoint::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for CartesianPoint {
    type Output = CartesianPoint;

    fn mul(self, rhs: f64) -> CartesianPoint {
        CartesianPoint::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

pub fn to_cartesian(p: GeoPoint) -> CartesianPoint {
    let lat = p.lat.to_radians();
    let lon = p.lon.to_radians();
    CartesianPoint {
        x: EARTH_RADIUS_KM * lat.cos() * lon.cos(),
        y: EARTH_RADIUS_KM * lat.cos() * lon.sin(),
        z: EARTH_RADIUS_KM * lat.sin(),
    }
}

/// Inverse of [`to_cartesian`]. Expects a point on, or very near, the sphere;
/// the result is not renormalised.
pub fn to_geo(p: CartesianPoint) -> GeoPoint {
    // scan-box corners sit slightly outside the sphere
    let sin_lat = (p.z / EARTH_RADIUS_KM).clamp(-1.0, 1.0);
    GeoPoint {
        lat: sin_lat.asin().to_degrees(),
        lon: p.y.atan2(p.x).to_degrees(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn equator_meridian_maps_to_x_axis() {
        let c = to_cartesian(GeoPoint::new(0.0, 0.0));
        assert_approx_eq!(c.x, EARTH_RADIUS_KM, 1e-9);
        assert_approx_eq!(c.y, 0.0, 1e-9);
        assert_approx_eq!(c.z, 0.0, 1e-9);

        let north = to_cartesian(GeoPoint::new(90.0, 0.0));
        assert_approx_eq!(north.z, EARTH_RADIUS_KM, 1e-9);
    }

    #[test]
    fn round_trip_recovers_coordinates() {
        let samples = [
            GeoPoint::new(48.515966, 8.869765),
            GeoPoint::new(-33.8688, 151.2093),
            GeoPoint::new(0.0, -179.5),
            GeoPoint::new(64.1466, -21.9426),
            GeoPoint::new(-89.0, 45.0),
        ];
        for p in samples {
            let back = to_geo(to_cartesian(p));
            assert_approx_eq!(back.lat, p.lat, 1e-9);
            assert_approx_eq!(back.lon, p.lon, 1e-9);
        }
    }

    #[test]
    fn cross_product_is_orthogonal() {
        let a = CartesianPoint::new(1.0, 2.0, 3.0);
        let b = CartesianPoint::new(-4.0, 0.5, 2.0);
        let c = a.cross(&b);
        assert_approx_eq!(c.x * a.x + c.y * a.y + c.z * a.z, 0.0, 1e-12);
        assert_approx_eq!(c.x * b.x + c.y * b.y + c.z * b.z, 0.0, 1e-12);
    }

    #[test]
    fn normalizing_zero_vector_fails() {
        assert!(CartesianPoint::new(0.0, 0.0, 0.0).normalized().is_none());
        let unit = CartesianPoint::new(3.0, 0.0, 4.0).normalized().unwrap();
        assert_approx_eq!(unit.norm(), 1.0, 1e-12);
    }
}
