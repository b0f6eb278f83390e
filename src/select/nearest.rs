use log::warn;
use serde::Serialize;

use crate::poi::response::PoiRecord;
use crate::GeoPoint;

/// A speed camera resolved against the vehicle position.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Camera {
    /// Enforced limit in km/h, always > 0.
    pub speed_limit: u32,
    pub city: String,
    pub street: String,
    pub distance_km: f64,
    pub bearing_deg: f64,
    pub position: GeoPoint,
}

/// Outcome of one poll cycle.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Detection {
    #[default]
    NoCameraFound,
    QueryFailed,
    Found(Camera),
}

impl Detection {
    pub fn camera(&self) -> Option<&Camera> {
        match self {
            Detection::Found(camera) => Some(camera),
            _ => None,
        }
    }

    /// Legacy single-integer encoding: 0 = nothing in range, -1 = query failed,
    /// otherwise the speed limit.
    pub fn speed_limit_code(&self) -> i32 {
        match self {
            Detection::NoCameraFound => 0,
            Detection::QueryFailed => -1,
            Detection::Found(camera) => i32::try_from(camera.speed_limit).unwrap_or(i32::MAX),
        }
    }
}

/// Picks the closest record carrying a usable speed limit.
///
/// Records without a limit are skipped silently; malformed ones are skipped
/// with a warning. Ties keep the earlier record.
pub fn select_nearest(records: &[PoiRecord], current: GeoPoint) -> Detection {
    let mut best: Option<Camera> = None;
    for record in records {
        let Some(camera) = resolve(record, current) else {
            continue;
        };
        let closer = best
            .as_ref()
            .map_or(true, |b| camera.distance_km < b.distance_km);
        if closer {
            best = Some(camera);
        }
    }
    best.map_or(Detection::NoCameraFound, Detection::Found)
}

fn resolve(record: &PoiRecord, current: GeoPoint) -> Option<Camera> {
    let vmax = record.vmax.as_deref().map(str::trim).filter(|v| !v.is_empty())?;

    let speed_limit = match parse_speed_limit(vmax) {
        Some(limit) if limit > 0 => limit,
        _ => {
            warn!("skipping poi {:?}: unusable speed limit {vmax:?}", record.id);
            return None;
        }
    };

    let Some(position) = record.position() else {
        warn!(
            "skipping poi {:?}: bad coordinates lat={:?} lng={:?}",
            record.id, record.lat, record.lng
        );
        return None;
    };

    Some(Camera {
        speed_limit,
        city: record.address.city.clone().unwrap_or_default(),
        street: record.address.street.clone().unwrap_or_default(),
        distance_km: current.distance_km(&position),
        bearing_deg: current.bearing_to(&position),
        position,
    })
}

/// Integer limit; whole-number floats such as `50.0` are accepted too.
fn parse_speed_limit(raw: &str) -> Option<u32> {
    if let Ok(limit) = raw.parse::<u32>() {
        return Some(limit);
    }
    let value = raw.parse::<f64>().ok()?;
    if value.fract() == 0.0 && (0.0..=u32::MAX as f64).contains(&value) {
        Some(value as u32)
    } else {
        None
    }
}
