use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::ClientError;

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResult {
    pub geometry: Geometry,
    #[serde(default)]
    pub components: AddressComponents,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Geometry {
    pub lat: f64,
    pub lng: f64,
}

/// Subset of the locality components reported by the provider.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressComponents {
    pub country: Option<String>,
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolves a free-text address. An empty vec means nothing matched.
    async fn geocode(&self, address: &str) -> Result<Vec<GeocodeResult>, ClientError>;
}

#[derive(Deserialize)]
struct OpenCageResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

/// Forward geocoding through the OpenCage JSON API.
#[derive(Clone)]
pub struct OpenCageGeocoder {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenCageGeocoder {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl Geocoder for OpenCageGeocoder {
    async fn geocode(&self, address: &str) -> Result<Vec<GeocodeResult>, ClientError> {
        let resp = self
            .client
            .get(format!("{}/geocode/v1/json", self.base_url))
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", address),
                ("pretty", "1"),
                ("no_annotations", "1"),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ClientError::from_response("geocoder", resp).await);
        }

        let body = resp.json::<OpenCageResponse>().await?;
        tracing::debug!(results = body.results.len(), "geocoded address");
        Ok(body.results)
    }
}
