use log::debug;
use serde::{Deserialize, Serialize};

use crate::scan::scan_box::{ScanBox, ScanParams};
use crate::GeoPoint;

/// Axis-aligned lon/lat envelope used as the POI query filter.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BoundingBox {
    pub min: GeoPoint,
    pub max: GeoPoint,
}

impl BoundingBox {
    pub fn from_corners(corners: &[GeoPoint; 4]) -> Self {
        let mut min = corners[0];
        let mut max = corners[0];
        for corner in &corners[1..] {
            min.lon = min.lon.min(corner.lon);
            min.lat = min.lat.min(corner.lat);
            max.lon = max.lon.max(corner.lon);
            max.lat = max.lat.max(corner.lat);
        }
        BoundingBox { min, max }
    }

    /// Zero-area box collapsed onto a single position.
    pub fn point(p: GeoPoint) -> Self {
        BoundingBox { min: p, max: p }
    }

    pub fn contains(&self, p: &GeoPoint) -> bool {
        (self.min.lon..=self.max.lon).contains(&p.lon) && (self.min.lat..=self.max.lat).contains(&p.lat)
    }

    pub fn width_deg(&self) -> f64 {
        self.max.lon - self.min.lon
    }

    pub fn height_deg(&self) -> f64 {
        self.max.lat - self.min.lat
    }

    pub fn is_empty(&self) -> bool {
        self.width_deg() == 0.0 && self.height_deg() == 0.0
    }

    /// `min_lon,min_lat,max_lon,max_lat`, the order the POI service expects.
    pub fn query_value(&self) -> String {
        format!(
            "{:.6},{:.6},{:.6},{:.6}",
            self.min.lon, self.min.lat, self.max.lon, self.max.lat
        )
    }
}

impl From<&ScanBox> for BoundingBox {
    fn from(scan_box: &ScanBox) -> Self {
        BoundingBox::from_corners(&scan_box.corners)
    }
}

/// Bounding box of the look-ahead region for the heading `last -> current`.
///
/// Degenerate headings collapse to `BoundingBox::point(current)`.
pub fn lookahead_bounds(last: GeoPoint, current: GeoPoint, params: &ScanParams) -> BoundingBox {
    match ScanBox::build(last, current, params) {
        Ok(scan_box) => BoundingBox::from(&scan_box),
        Err(err) => {
            debug!("no scan box for {last} -> {current}: {err}");
            BoundingBox::point(current)
        }
    }
}
