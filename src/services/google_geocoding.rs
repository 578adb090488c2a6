//! Google Geocoding API client

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::{debug, info};

use super::{GeocodingService, retrying_client};
use crate::config::EstateAiConfig;
use crate::error::EstateAiError;
use crate::models::{Coordinate, GeocodedPlace};
use crate::Result;

/// Geocoding client backed by the Google Geocoding API
pub struct GoogleGeocodingClient {
    client: ClientWithMiddleware,
    api_key: Option<String>,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodingResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    formatted_address: String,
    place_id: String,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

impl GoogleGeocodingClient {
    /// Create a new client from application config
    #[must_use]
    pub fn new(config: &EstateAiConfig) -> Self {
        Self {
            client: retrying_client(
                config.geocoding.timeout_seconds,
                config.geocoding.max_retries,
            ),
            api_key: config.geocoding.api_key.clone(),
            base_url: config.geocoding.base_url.clone(),
        }
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            EstateAiError::config("Geocoding API key is not configured")
        })
    }
}

#[async_trait]
impl GeocodingService for GoogleGeocodingClient {
    async fn geocode(&self, address: &str) -> Result<Option<GeocodedPlace>> {
        debug!("Geocoding address: {}", address);

        let url = format!(
            "{}?address={}&key={}",
            self.base_url,
            urlencoding::encode(address),
            self.api_key()?
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| EstateAiError::upstream(format!("Geocoding request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(EstateAiError::upstream(format!(
                "Geocoding API error: {}",
                response.status()
            )));
        }

        let body: GeocodingResponse = response
            .json()
            .await
            .map_err(|e| EstateAiError::parse(format!("Failed to parse geocoding response: {e}")))?;

        match body.status.as_str() {
            "OK" => {
                // The first result is the provider's best match
                let Some(first) = body.results.into_iter().next() else {
                    return Ok(None);
                };
                info!(
                    "Geocoded '{}' to '{}'",
                    address, first.formatted_address
                );
                Ok(Some(GeocodedPlace {
                    coordinate: Coordinate::new(first.geometry.location.lat, first.geometry.location.lng),
                    formatted_address: first.formatted_address,
                    place_id: first.place_id,
                }))
            }
            "ZERO_RESULTS" => {
                info!("No geocoding match for '{}'", address);
                Ok(None)
            }
            other => Err(EstateAiError::upstream(format!(
                "Geocoding API returned status {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let config = EstateAiConfig::default();
        let client = GoogleGeocodingClient::new(&config);
        assert_eq!(
            client.base_url,
            "https://maps.googleapis.com/maps/api/geocode/json"
        );
        assert!(client.api_key().is_err());
    }

    #[test]
    fn test_response_deserialization() {
        let body = r#"{
            "status": "OK",
            "results": [{
                "formatted_address": "2150 Balsam St, Vancouver, BC V6K 3M2, Canada",
                "place_id": "ChIJ-example",
                "geometry": {"location": {"lat": 49.2665, "lng": -123.1548}}
            }]
        }"#;
        let parsed: GeocodingResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.status, "OK");
        assert_eq!(parsed.results.len(), 1);
        assert_eq!(parsed.results[0].geometry.location.lat, 49.2665);
    }

    #[test]
    fn test_zero_results_deserialization() {
        let body = r#"{"status": "ZERO_RESULTS", "results": []}"#;
        let parsed: GeocodingResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.status, "ZERO_RESULTS");
        assert!(parsed.results.is_empty());
    }
}
