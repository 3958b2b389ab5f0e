//! OpenAQ "latest measurements" client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::location::Coordinates;
use crate::error::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.openaq.org";
/// Station search radius around the coordinates
pub const SEARCH_RADIUS_METERS: u32 = 20_000;
/// Maximum number of stations returned
pub const RESULT_LIMIT: u32 = 50;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Body of a `/v2/latest` response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LatestResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub results: Vec<StationResult>,
}

/// One monitoring station and its latest readings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationResult {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub measurements: Vec<Measurement>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    #[serde(default)]
    pub parameter: Option<String>,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Source of live station measurements
#[async_trait]
pub trait AirQualityProvider: Send + Sync {
    /// Latest measurements from stations near `coordinates`
    async fn latest(&self, coordinates: Coordinates) -> Result<LatestResponse>;
}

/// HTTP client for the OpenAQ API
pub struct OpenAqClient {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl OpenAqClient {
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| Error::Config(format!("Invalid OpenAQ base URL '{base_url}': {e}")))?;
        // keep any path prefix when joining the endpoint
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    /// Full request URL for `coordinates`
    pub fn latest_url(&self, coordinates: Coordinates) -> Result<Url> {
        let mut url = self
            .base_url
            .join("v2/latest")
            .map_err(|e| Error::Config(format!("Invalid OpenAQ endpoint: {e}")))?;
        url.query_pairs_mut()
            .append_pair(
                "coordinates",
                &format!("{},{}", coordinates.latitude, coordinates.longitude),
            )
            .append_pair("radius", &SEARCH_RADIUS_METERS.to_string())
            .append_pair("limit", &RESULT_LIMIT.to_string());
        Ok(url)
    }
}

#[async_trait]
impl AirQualityProvider for OpenAqClient {
    async fn latest(&self, coordinates: Coordinates) -> Result<LatestResponse> {
        let url = self.latest_url(coordinates)?;
        debug!("GET {}", url);

        let mut request = self.client.get(url);
        if let Some(key) = &self.api_key {
            request = request.header("X-API-Key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Network(format!("Failed to fetch air quality: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Network(format!(
                "Failed to fetch air quality: HTTP {status}"
            )));
        }

        response
            .json::<LatestResponse>()
            .await
            .map_err(|e| Error::Network(format!("Invalid air quality response: {e}")))
    }
}
