pub mod config;
pub mod geo;
pub mod poi;
pub mod poller;
pub mod scan;
pub mod select;
pub mod track;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometres. Cartesian points live on this sphere.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A geographic coordinate in degrees.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Like `new`, but rejects coordinates outside lat [-90, 90] / lon [-180, 180].
    pub fn checked(lat: f64, lon: f64) -> Option<Self> {
        if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon) {
            Some(Self { lat, lon })
        } else {
            None
        }
    }

    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        geo::distance::distance_km(*self, *other)
    }

    pub fn bearing_to(&self, other: &GeoPoint) -> f64 {
        geo::distance::bearing_degrees(*self, *other)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}
