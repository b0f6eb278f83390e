pub mod client;
pub mod response;

use std::future::Future;
use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

use crate::scan::bounds::BoundingBox;
use response::{PoiRecord, PoiResponse};

#[derive(Debug, Error)]
pub enum PoiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("POI service returned {0}")]
    Status(StatusCode),
    #[error("malformed POI response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("POI query timed out after {0:?}")]
    Timeout(Duration),
}

/// Anything that can list points of interest inside a bounding box.
pub trait PoiSource {
    fn fetch(
        &self,
        bounds: &BoundingBox,
    ) -> impl Future<Output = Result<Vec<PoiRecord>, PoiError>> + Send;
}

pub fn decode_response(body: &[u8]) -> Result<PoiResponse, PoiError> {
    Ok(serde_json::from_slice(body)?)
}
