use std::time::Duration;

use assert_approx_eq::assert_approx_eq;
use speedcam_engine::geo::distance::{bearing_degrees, distance_km};
use speedcam_engine::geo::projection::{to_cartesian, to_geo};
use speedcam_engine::poi::response::PoiRecord;
use speedcam_engine::poi::{decode_response, PoiError, PoiSource};
use speedcam_engine::poller::{detection_channel, poll_once, run_poller, PollerConfig};
use speedcam_engine::scan::bounds::{lookahead_bounds, BoundingBox};
use speedcam_engine::scan::scan_box::{ScanBox, ScanParams};
use speedcam_engine::select::nearest::{select_nearest, Detection};
use speedcam_engine::track::{demo_route, PositionTracker};
use speedcam_engine::GeoPoint;
use tokio::sync::watch;

const RESPONSE: &str = r#"{
    "pois": [
        { "id": "1", "lat": "48.515", "lng": "8.870", "vmax": "50",
          "address": { "city": "Hailfingen", "street": "Hauptstr." } },
        { "id": "2", "lat": "48.520", "lng": "8.875", "vmax": "",
          "address": { "city": "Hailfingen", "street": "Kreuzung" } },
        { "id": "3", "lat": "48.5155", "lng": "8.8701", "vmax": "30",
          "address": { "city": "Hailfingen", "street": "Seebronner Str." } }
    ]
}"#;

/// Serves a fixed JSON body, but only for boxes containing `anchor`.
struct FixtureSource {
    body: &'static str,
    anchor: GeoPoint,
}

impl PoiSource for FixtureSource {
    async fn fetch(&self, bounds: &BoundingBox) -> Result<Vec<PoiRecord>, PoiError> {
        if !bounds.contains(&self.anchor) {
            return Ok(Vec::new());
        }
        Ok(decode_response(self.body.as_bytes())?.pois)
    }
}

#[test]
fn geometry_pipeline_on_recorded_fixes() {
    let last = GeoPoint::new(48.515966, 8.869765);
    let current = GeoPoint::new(48.515276, 8.870355);

    let scan_box = ScanBox::build(last, current, &ScanParams::default()).expect("scan box");
    let bounds = BoundingBox::from(&scan_box);
    assert!(scan_box.corners.iter().all(|c| bounds.contains(c)));
    assert!(bounds.min.lon <= bounds.max.lon && bounds.min.lat <= bounds.max.lat);
    assert_eq!(bounds, lookahead_bounds(last, current, &ScanParams::default()));

    for p in [last, current] {
        let back = to_geo(to_cartesian(p));
        assert_approx_eq!(back.lat, p.lat, 1e-9);
        assert_approx_eq!(back.lon, p.lon, 1e-9);
    }

    // heading roughly south-east
    let heading = bearing_degrees(last, current);
    assert!(heading > 90.0 && heading < 180.0, "heading {heading}");
    assert_approx_eq!(distance_km(last, current), distance_km(current, last), 1e-12);
}

#[test]
fn selector_scenario_from_recorded_drive() {
    let current = GeoPoint::new(48.515966, 8.869765);
    let records = decode_response(RESPONSE.as_bytes()).unwrap().pois;

    let camera = select_nearest(&records, current).camera().cloned().expect("camera");
    let expected = distance_km(current, GeoPoint::new(48.5155, 8.8701));
    assert_eq!(camera.speed_limit, 30);
    assert_eq!(camera.street, "Seebronner Str.");
    assert_approx_eq!(camera.distance_km, expected, 1e-12);
    assert!(camera.distance_km < distance_km(current, GeoPoint::new(48.515, 8.870)));
}

#[tokio::test]
async fn demo_drive_through_poller() {
    let track = demo_route("hailfingen-seebronn").expect("demo route");
    let mut tracker = PositionTracker::new();
    let heading = track
        .fixes
        .iter()
        .filter_map(|fix| tracker.push(*fix))
        .nth(1)
        .expect("heading");

    let source = FixtureSource {
        body: RESPONSE,
        anchor: GeoPoint::new(48.5155, 8.8701),
    };
    let config = PollerConfig {
        interval: Duration::from_millis(5),
        retry_backoff: Duration::from_millis(5),
        ..PollerConfig::default()
    };

    let detection = poll_once(&source, heading, &config).await;
    assert!(matches!(detection, Detection::Found(_)));

    let (heading_tx, heading_rx) = watch::channel(None);
    let (detection_tx, mut feed) = detection_channel();
    let task = tokio::spawn(run_poller(source, heading_rx, detection_tx, config));

    heading_tx.send(Some(heading)).unwrap();
    let mut published = None;
    for _ in 0..500 {
        if let Some(detection) = feed.latest() {
            published = Some(detection);
            break;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    assert_eq!(published.expect("published").speed_limit_code(), detection.speed_limit_code());
    assert_eq!(feed.current(), &detection);

    drop(feed);
    tokio::time::timeout(Duration::from_secs(2), task)
        .await
        .expect("poller stops")
        .unwrap();
}
