use serde::{Deserialize, Deserializer, Serialize};

use crate::GeoPoint;

/// Body of a POI query response. Only `pois` is of interest.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PoiResponse {
    #[serde(default)]
    pub pois: Vec<PoiRecord>,
}

/// One point of interest as delivered by the service. Numeric fields are kept
/// as raw strings; the service sends them quoted but some revisions send plain
/// numbers, so both are accepted.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PoiRecord {
    #[serde(default, deserialize_with = "text_or_number")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub lat: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub lng: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub vmax: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "text_or_number")]
    pub kind: Option<String>,
    #[serde(default)]
    pub address: PoiAddress,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PoiAddress {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
}

impl PoiRecord {
    /// Parsed and range-checked coordinates, if both are present and valid.
    pub fn position(&self) -> Option<GeoPoint> {
        let lat = self.lat.as_deref()?.trim().parse::<f64>().ok()?;
        let lon = self.lng.as_deref()?.trim().parse::<f64>().ok()?;
        GeoPoint::checked(lat, lon)
    }
}

fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(text)) => Some(text),
        Some(Raw::Number(number)) => Some(number.to_string()),
        None => None,
    })
}
