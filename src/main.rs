use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use log::{info, warn};
use speedcam_engine::config::AppConfig;
use speedcam_engine::poi::client::HttpPoiClient;
use speedcam_engine::poller::{detection_channel, run_poller, PollerConfig};
use speedcam_engine::select::nearest::Detection;
use speedcam_engine::track::{demo_route, demo_route_names, read_track_from_file, replay, PositionTracker, Track};
use tokio::sync::watch;

fn load_track(config: &AppConfig) -> Result<Track> {
    if let Some(path) = &config.replay.track {
        return read_track_from_file(path).with_context(|| format!("failed to read track {}", path.display()));
    }
    demo_route(&config.replay.route).cloned().ok_or_else(|| {
        anyhow!(
            "unknown route {:?}, available: {}",
            config.replay.route,
            demo_route_names().join(", ")
        )
    })
}

fn describe(detection: &Detection) -> String {
    match detection {
        Detection::NoCameraFound => "no camera ahead".to_string(),
        Detection::QueryFailed => "camera lookup unavailable".to_string(),
        Detection::Found(camera) => {
            let place = [camera.street.as_str(), camera.city.as_str()]
                .into_iter()
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "{} km/h camera in {:.0} m at {:.0}\u{b0} ({})",
                camera.speed_limit,
                camera.distance_km * 1000.0,
                camera.bearing_deg,
                if place.is_empty() { "unknown location" } else { place.as_str() }
            )
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let config = AppConfig::from_env().context("failed to load configuration")?;
    let track = load_track(&config)?;
    let client = HttpPoiClient::new(&config.poi).context("failed to build POI client")?;

    let (heading_tx, heading_rx) = watch::channel(None);
    let (detection_tx, mut feed) = detection_channel();

    let fix_period = Duration::from_millis(config.replay.fix_period_ms);
    tokio::spawn(async move {
        let mut tracker = PositionTracker::new();
        replay(&track, &mut tracker, fix_period, &heading_tx).await;
        // hold the last heading while anyone still polls
        heading_tx.closed().await;
    });
    let poller = tokio::spawn(run_poller(
        client,
        heading_rx,
        detection_tx,
        PollerConfig::from(&config),
    ));

    let mut frames = tokio::time::interval(Duration::from_millis(config.replay.frame_ms));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    loop {
        tokio::select! {
            _ = frames.tick() => {
                if let Some(detection) = feed.latest() {
                    match detection {
                        Detection::QueryFailed => warn!("{}", describe(&detection)),
                        _ => info!("{}", describe(&detection)),
                    }
                }
            }
            signal = &mut ctrl_c => {
                signal.context("failed to listen for ctrl-c")?;
                info!("shutting down");
                break;
            }
        }
    }

    drop(feed);
    poller.await.context("poller task panicked")?;
    Ok(())
}
