pub mod io;
pub mod tracker;

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::GeoPoint;

pub use io::{read_track_from_file, write_track_to_file, TrackError};
pub use tracker::{replay, Heading, PositionTracker};

/// A recorded drive: position fixes in the order they were taken.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Track {
    pub name: String,
    pub fixes: Vec<GeoPoint>,
}

impl Track {
    pub fn new(name: impl Into<String>, fixes: Vec<GeoPoint>) -> Self {
        Self {
            name: name.into(),
            fixes,
        }
    }

    pub fn len(&self) -> usize {
        self.fixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixes.is_empty()
    }
}

/// Short test drives recorded around Hailfingen and Karlsruhe.
static DEMO_ROUTES: Lazy<HashMap<&'static str, Track>> = Lazy::new(|| {
    let routes: [(&'static str, Vec<GeoPoint>); 3] = [
        (
            "hailfingen-seebronn",
            vec![
                GeoPoint::new(48.516655, 8.869175),
                GeoPoint::new(48.515966, 8.869765),
                GeoPoint::new(48.515276, 8.870355),
                GeoPoint::new(48.514586, 8.870945),
                GeoPoint::new(48.513896, 8.871535),
            ],
        ),
        (
            "hek-north",
            vec![
                GeoPoint::new(49.0161, 8.3980),
                GeoPoint::new(49.0175, 8.3977),
                GeoPoint::new(49.0189, 8.3974),
            ],
        ),
        (
            "karlsruhe-west",
            vec![
                GeoPoint::new(49.0161, 8.3980),
                GeoPoint::new(49.01880678328532, 8.389688331453078),
            ],
        ),
    ];
    routes
        .into_iter()
        .map(|(name, fixes)| (name, Track::new(name, fixes)))
        .collect()
});

pub fn demo_route(name: &str) -> Option<&'static Track> {
    DEMO_ROUTES.get(name)
}

pub fn demo_route_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = DEMO_ROUTES.keys().copied().collect();
    names.sort_unstable();
    names
}
