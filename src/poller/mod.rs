//! Background poll loop and the latest-value feed it publishes into.

use std::time::Duration;

use log::{debug, info, warn};
use tokio::sync::watch;

use crate::config::{AppConfig, PollConfig};
use crate::poi::{PoiError, PoiSource};
use crate::scan::bounds::lookahead_bounds;
use crate::scan::scan_box::ScanParams;
use crate::select::nearest::{select_nearest, Detection};
use crate::track::Heading;

#[derive(Clone, Debug, PartialEq)]
pub struct PollerConfig {
    pub interval: Duration,
    pub retry_backoff: Duration,
    pub request_timeout: Duration,
    pub scan: ScanParams,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for PollerConfig {
    fn from(config: &AppConfig) -> Self {
        let PollConfig {
            interval_ms,
            retry_backoff_ms,
        } = config.poll;
        Self {
            interval: Duration::from_millis(interval_ms),
            retry_backoff: Duration::from_millis(retry_backoff_ms),
            request_timeout: config.poi.timeout(),
            scan: config.scan,
        }
    }
}

/// Runs one cycle: bounding box, query, selection.
pub async fn poll_once<S: PoiSource>(source: &S, heading: Heading, config: &PollerConfig) -> Detection {
    let bounds = lookahead_bounds(heading.last, heading.current, &config.scan);
    debug!("scanning box {}", bounds.query_value());

    let fetched = match tokio::time::timeout(config.request_timeout, source.fetch(&bounds)).await {
        Ok(result) => result,
        Err(_) => Err(PoiError::Timeout(config.request_timeout)),
    };

    match fetched {
        Ok(records) => select_nearest(&records, heading.current),
        Err(err) => {
            warn!("POI query failed: {err}");
            Detection::QueryFailed
        }
    }
}

/// Polls until nobody reads detections any more or the heading sender is gone.
///
/// Each cycle publishes exactly one `Detection`, replacing the previous one.
/// Failures back off for `retry_backoff` and are retried; they never end the
/// loop. A parked vehicle keeps being polled with its last heading. Every wait
/// also watches for the consumer going away, so shutdown never waits out a
/// fetch or a pause.
pub async fn run_poller<S: PoiSource>(
    source: S,
    mut headings: watch::Receiver<Option<Heading>>,
    detections: watch::Sender<Detection>,
    config: PollerConfig,
) {
    info!(
        "poller started (interval {:?}, timeout {:?})",
        config.interval, config.request_timeout
    );
    loop {
        let heading = *headings.borrow_and_update();
        let Some(heading) = heading else {
            // no heading yet; wait for the first one
            tokio::select! {
                _ = detections.closed() => break,
                changed = headings.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
            continue;
        };

        let detection = tokio::select! {
            _ = detections.closed() => break,
            detection = poll_once(&source, heading, &config) => detection,
        };
        let failed = detection == Detection::QueryFailed;
        if let Some(camera) = detection.camera() {
            debug!(
                "camera {} km/h at {:.3} km ({} {})",
                camera.speed_limit, camera.distance_km, camera.city, camera.street
            );
        }
        detections.send_replace(detection);

        let pause = if failed { config.retry_backoff } else { config.interval };
        tokio::select! {
            _ = detections.closed() => break,
            _ = tokio::time::sleep(pause) => {}
        }

        if headings.has_changed().is_err() {
            debug!("heading sender dropped");
            break;
        }
    }
    info!("poller stopped");
}

/// Consumer side of the detection channel.
///
/// `latest` never blocks: it hands out a detection only when a newer one was
/// published since the last call. `current` always holds the last one seen.
pub struct CameraFeed {
    receiver: watch::Receiver<Detection>,
    current: Detection,
}

impl CameraFeed {
    pub fn new(receiver: watch::Receiver<Detection>) -> Self {
        let current = receiver.borrow().clone();
        Self { receiver, current }
    }

    pub fn latest(&mut self) -> Option<Detection> {
        match self.receiver.has_changed() {
            Ok(true) => {
                self.current = self.receiver.borrow_and_update().clone();
                Some(self.current.clone())
            }
            _ => None,
        }
    }

    pub fn current(&self) -> &Detection {
        &self.current
    }
}

/// Channel pair for publishing detections, starting at `NoCameraFound`.
pub fn detection_channel() -> (watch::Sender<Detection>, CameraFeed) {
    let (tx, rx) = watch::channel(Detection::default());
    (tx, CameraFeed::new(rx))
}
