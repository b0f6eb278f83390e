use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::projection::{to_cartesian, to_geo};
use crate::GeoPoint;

/// Forward look-ahead, measured along the heading chord (km on the Earth sphere).
pub const DEFAULT_FORWARD_KM: f64 = 1.0;
/// Half of the box width on either side of the heading.
pub const DEFAULT_HALF_WIDTH_KM: f64 = 0.4;

/// Below this sine of the angle between position and heading the lateral
/// axis is treated as undefined.
const PARALLEL_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeometryError {
    #[error("last and current position coincide, heading is undefined")]
    ZeroHeading,
    #[error("heading is parallel to the position vector, lateral axis is undefined")]
    ZeroLateral,
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScanParams {
    pub forward_km: f64,
    pub half_width_km: f64,
}

impl Default for ScanParams {
    fn default() -> Self {
        Self {
            forward_km: DEFAULT_FORWARD_KM,
            half_width_km: DEFAULT_HALF_WIDTH_KM,
        }
    }
}

/// Look-ahead quadrilateral in front of the vehicle.
///
/// Corners are kept in the order they are built: A and B flank the current
/// position, C and D flank the forward point. After back-projection the four
/// points are not guaranteed to form a simple polygon; only their envelope is
/// used downstream.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScanBox {
    pub corners: [GeoPoint; 4],
}

impl ScanBox {
    pub fn build(last: GeoPoint, current: GeoPoint, params: &ScanParams) -> Result<Self, GeometryError> {
        let p0 = to_cartesian(last);
        let p1 = to_cartesian(current);

        let heading = p1 - p0;
        let heading_unit = heading.normalized().ok_or(GeometryError::ZeroHeading)?;
        let p2 = p1 + heading_unit * params.forward_km;

        // Normal of the plane through the origin, p1 and the heading.
        let lateral = p1.cross(&heading);
        if lateral.norm() <= PARALLEL_TOLERANCE * p1.norm() * heading.norm() {
            return Err(GeometryError::ZeroLateral);
        }
        let lateral_unit = lateral.normalized().ok_or(GeometryError::ZeroLateral)?;
        let offset = lateral_unit * params.half_width_km;

        Ok(ScanBox {
            corners: [
                to_geo(p1 + offset),
                to_geo(p1 - offset),
                to_geo(p2 + offset),
                to_geo(p2 - offset),
            ],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    const LAST: GeoPoint = GeoPoint::new(48.515966, 8.869765);
    const CURRENT: GeoPoint = GeoPoint::new(48.515276, 8.870355);

    #[test]
    fn builds_four_finite_corners_near_current_position() {
        let sb = ScanBox::build(LAST, CURRENT, &ScanParams::default()).expect("scan box");
        for corner in sb.corners {
            assert!(corner.lat.is_finite() && corner.lon.is_finite());
            assert!((corner.lat - CURRENT.lat).abs() < 0.03, "{corner}");
            assert!((corner.lon - CURRENT.lon).abs() < 0.03, "{corner}");
        }
    }

    #[test]
    fn near_corners_flank_current_position() {
        let params = ScanParams::default();
        let sb = ScanBox::build(LAST, CURRENT, &params).unwrap();
        let [a, b, _, _] = sb.corners;
        assert_approx_eq!(a.distance_km(&CURRENT), params.half_width_km, 1e-3);
        assert_approx_eq!(b.distance_km(&CURRENT), params.half_width_km, 1e-3);
    }

    #[test]
    fn far_corners_lie_ahead_of_vehicle() {
        let params = ScanParams::default();
        let sb = ScanBox::build(LAST, CURRENT, &params).unwrap();
        let [a, b, c, d] = sb.corners;
        // Vehicle is heading south-east, so the far edge is further south.
        assert!(c.lat < a.lat);
        assert!(d.lat < b.lat);
        assert_approx_eq!(c.distance_km(&a), params.forward_km, 1e-3);
        assert_approx_eq!(d.distance_km(&b), params.forward_km, 1e-3);
    }

    #[test]
    fn identical_positions_are_rejected() {
        let err = ScanBox::build(CURRENT, CURRENT, &ScanParams::default()).unwrap_err();
        assert_eq!(err, GeometryError::ZeroHeading);
    }

    #[test]
    fn pole_to_pole_heading_has_no_lateral_axis() {
        let last = GeoPoint::new(-90.0, 0.0);
        let current = GeoPoint::new(90.0, 0.0);
        let err = ScanBox::build(last, current, &ScanParams::default()).unwrap_err();
        assert_eq!(err, GeometryError::ZeroLateral);
    }
}
