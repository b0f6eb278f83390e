use log::debug;
use reqwest::Client;

use crate::config::PoiConfig;
use crate::poi::response::PoiRecord;
use crate::poi::{decode_response, PoiError, PoiSource};
use crate::scan::bounds::BoundingBox;

/// HTTP client for the community POI endpoint.
pub struct HttpPoiClient {
    client: Client,
    base_url: String,
    types: String,
    zoom: u8,
}

impl HttpPoiClient {
    pub fn new(config: &PoiConfig) -> Result<Self, PoiError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            types: config.types.join(","),
            zoom: config.zoom,
        })
    }

    pub fn request_url(&self, bounds: &BoundingBox) -> String {
        format!(
            "{}?type={}&z={}&box={}",
            self.base_url,
            self.types,
            self.zoom,
            bounds.query_value()
        )
    }
}

impl PoiSource for HttpPoiClient {
    async fn fetch(&self, bounds: &BoundingBox) -> Result<Vec<PoiRecord>, PoiError> {
        let url = self.request_url(bounds);
        debug!("GET {url}");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PoiError::Status(status));
        }
        let body = response.bytes().await?;
        let decoded = decode_response(&body)?;
        debug!("POI service returned {} records", decoded.pois.len());
        Ok(decoded.pois)
    }
}
