use std::time::Duration;

use log::{debug, info};
use tokio::sync::watch;

use crate::track::Track;
use crate::GeoPoint;

/// The two most recent distinct fixes, oldest first.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Heading {
    pub last: GeoPoint,
    pub current: GeoPoint,
}

/// Keeps the last two distinct position fixes.
///
/// A fix equal to the current one is dropped, so a stopped vehicle keeps its
/// previous heading instead of producing a zero-length one.
#[derive(Clone, Debug, Default)]
pub struct PositionTracker {
    last: Option<GeoPoint>,
    current: Option<GeoPoint>,
}

impl PositionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a fix and returns the heading if it changed.
    pub fn push(&mut self, fix: GeoPoint) -> Option<Heading> {
        if self.current == Some(fix) {
            return None;
        }
        self.last = self.current.replace(fix);
        self.heading()
    }

    pub fn heading(&self) -> Option<Heading> {
        Some(Heading {
            last: self.last?,
            current: self.current?,
        })
    }

    pub fn current(&self) -> Option<GeoPoint> {
        self.current
    }
}

/// Feeds the fixes of `track` into `tracker`, one every `period`, publishing
/// each new heading. Returns when the track is exhausted or nobody listens.
pub async fn replay(
    track: &Track,
    tracker: &mut PositionTracker,
    period: Duration,
    headings: &watch::Sender<Option<Heading>>,
) {
    info!("replaying track {:?} ({} fixes)", track.name, track.len());
    for fix in &track.fixes {
        if let Some(heading) = tracker.push(*fix) {
            debug!("heading {} -> {}", heading.last, heading.current);
            if headings.send(Some(heading)).is_err() {
                return;
            }
        }
        tokio::time::sleep(period).await;
    }
    info!("track {:?} finished", track.name);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn needs_two_distinct_fixes() {
        let a = GeoPoint::new(48.515966, 8.869765);
        let b = GeoPoint::new(48.515276, 8.870355);
        let mut tracker = PositionTracker::new();

        assert_eq!(tracker.push(a), None);
        assert_eq!(tracker.push(a), None);
        assert_eq!(tracker.current(), Some(a));

        let heading = tracker.push(b).expect("heading");
        assert_eq!(heading, Heading { last: a, current: b });

        // standing still keeps the heading
        assert_eq!(tracker.push(b), None);
        assert_eq!(tracker.heading(), Some(heading));
    }

    #[tokio::test]
    async fn replay_publishes_each_heading() {
        let track = Track::new(
            "short",
            vec![
                GeoPoint::new(1.0, 1.0),
                GeoPoint::new(1.0, 1.0),
                GeoPoint::new(1.001, 1.0),
                GeoPoint::new(1.002, 1.0),
            ],
        );
        let (tx, mut rx) = watch::channel(None);
        let mut tracker = PositionTracker::new();

        replay(&track, &mut tracker, Duration::from_millis(1), &tx).await;

        assert!(rx.has_changed().unwrap());
        let latest = rx.borrow_and_update().expect("heading");
        assert_eq!(latest.last, GeoPoint::new(1.001, 1.0));
        assert_eq!(latest.current, GeoPoint::new(1.002, 1.0));
    }
}
