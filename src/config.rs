//! Runtime configuration.
//!
//! Everything has a default, so a missing config file is not an error. A few
//! values can be overridden from the environment for quick experiments.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::info;
use serde::Deserialize;
use thiserror::Error;

use crate::scan::scan_box::ScanParams;

pub const CONFIG_PATH_ENV: &str = "SPEEDCAM_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "speedcam.json";

const POI_URL_ENV: &str = "SPEEDCAM_POI_URL";
const ROUTE_ENV: &str = "SPEEDCAM_ROUTE";
const TRACK_ENV: &str = "SPEEDCAM_TRACK";

/// POI categories requested from the service: fixed and mobile cameras,
/// traffic-light and section control, plus the traffic layers.
const DEFAULT_POI_TYPES: &[&str] = &[
    "22", "26", "20", "101", "102", "103", "104", "105", "106", "107", "108", "109", "110",
    "111", "112", "113", "115", "117", "114", "ts", "0", "1", "2", "3", "4", "5", "6", "21",
    "23", "24", "25", "29", "vwd", "traffic",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub poi: PoiConfig,
    pub poll: PollConfig,
    pub scan: ScanParams,
    pub replay: ReplayConfig,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct PoiConfig {
    pub base_url: String,
    pub types: Vec<String>,
    pub zoom: u8,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for PoiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://cdn2.atudo.net/api/4.0/pois.php".into(),
            types: DEFAULT_POI_TYPES.iter().map(|t| t.to_string()).collect(),
            zoom: 17,
            timeout_secs: 15,
            user_agent: concat!("speedcam-engine/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl PoiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct PollConfig {
    pub interval_ms: u64,
    pub retry_backoff_ms: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            retry_backoff_ms: 1000,
        }
    }
}

/// Where the position fixes come from.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReplayConfig {
    /// Built-in demo route, used when `track` is unset.
    pub route: String,
    /// Recorded track file (`.json` or compressed binary).
    pub track: Option<PathBuf>,
    pub fix_period_ms: u64,
    pub frame_ms: u64,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            route: "hailfingen-seebronn".into(),
            track: None,
            fix_period_ms: 1000,
            frame_ms: 250,
        }
    }
}

impl AppConfig {
    /// Reads `SPEEDCAM_CONFIG` (or `speedcam.json`), then applies env overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::load_or_default(Path::new(&path))?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
                info!("no config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(POI_URL_ENV) {
            self.poi.base_url = url;
        }
        if let Some(route) = lookup(ROUTE_ENV) {
            self.replay.route = route;
        }
        if let Some(track) = lookup(TRACK_ENV) {
            self.replay.track = Some(PathBuf::from(track));
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| -> Result<(), ConfigError> {
            Err(ConfigError::InvalidValue(msg.to_string()))
        };

        if self.poi.base_url.trim().is_empty() {
            return invalid("poi.base_url must not be empty");
        }
        if self.poi.types.is_empty() {
            return invalid("poi.types must list at least one category");
        }
        if self.poi.timeout_secs == 0 {
            return invalid("poi.timeout_secs must be positive");
        }
        if self.poll.interval_ms == 0 || self.poll.retry_backoff_ms == 0 {
            return invalid("poll intervals must be positive");
        }
        if !(self.scan.forward_km > 0.0) || !(self.scan.half_width_km > 0.0) {
            return invalid("scan lengths must be positive");
        }
        if self.replay.fix_period_ms == 0 || self.replay.frame_ms == 0 {
            return invalid("replay periods must be positive");
        }
        Ok(())
    }
}
