//! Google Places API client (nearby search and place details)

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::{debug, info};

use super::{PlaceSearchService, retrying_client};
use crate::config::EstateAiConfig;
use crate::error::EstateAiError;
use crate::models::{Coordinate, PlaceCandidate, PlaceDetails};
use crate::Result;

/// Place search client backed by the Google Places API
pub struct GooglePlacesClient {
    client: ClientWithMiddleware,
    api_key: Option<String>,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct NearbySearchResponse {
    status: String,
    #[serde(default)]
    results: Vec<NearbyPlace>,
}

#[derive(Debug, Deserialize)]
struct NearbyPlace {
    name: String,
    #[serde(default)]
    types: Vec<String>,
    vicinity: Option<String>,
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

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    status: String,
    result: Option<DetailsResult>,
}

#[derive(Debug, Deserialize)]
struct DetailsResult {
    name: String,
    formatted_address: Option<String>,
}

impl GooglePlacesClient {
    /// Create a new client from application config
    #[must_use]
    pub fn new(config: &EstateAiConfig) -> Self {
        Self {
            client: retrying_client(config.places.timeout_seconds, config.places.max_retries),
            api_key: config.places.api_key.clone(),
            base_url: config.places.base_url.clone(),
        }
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| EstateAiError::config("Places API key is not configured"))
    }
}

impl From<NearbyPlace> for PlaceCandidate {
    fn from(place: NearbyPlace) -> Self {
        Self {
            name: place.name,
            categories: place.types,
            location: Coordinate::new(place.geometry.location.lat, place.geometry.location.lng),
            address: place.vicinity,
        }
    }
}

#[async_trait]
impl PlaceSearchService for GooglePlacesClient {
    async fn search_nearby(
        &self,
        origin: Coordinate,
        category: &str,
        radius_m: u32,
        keyword: Option<&str>,
    ) -> Result<Vec<PlaceCandidate>> {
        debug!(
            "Searching places of type '{}' within {}m of ({}, {})",
            category, radius_m, origin.lat, origin.lng
        );

        let mut url = format!(
            "{}/nearbysearch/json?location={},{}&radius={}&type={}&key={}",
            self.base_url,
            origin.lat,
            origin.lng,
            radius_m,
            category,
            self.api_key()?
        );
        if let Some(keyword) = keyword {
            url.push_str(&format!("&keyword={}", urlencoding::encode(keyword)));
        }

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| EstateAiError::upstream(format!("Place search request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(EstateAiError::upstream(format!(
                "Places API error: {}",
                response.status()
            )));
        }

        let body: NearbySearchResponse = response.json().await.map_err(|e| {
            EstateAiError::parse(format!("Failed to parse place search response: {e}"))
        })?;

        match body.status.as_str() {
            "OK" => {
                let candidates: Vec<PlaceCandidate> =
                    body.results.into_iter().map(PlaceCandidate::from).collect();
                info!("Found {} '{}' candidates", candidates.len(), category);
                Ok(candidates)
            }
            "ZERO_RESULTS" => Ok(Vec::new()),
            other => Err(EstateAiError::upstream(format!(
                "Places API returned status {other}"
            ))),
        }
    }

    async fn place_details(&self, place_id: &str) -> Result<Option<PlaceDetails>> {
        debug!("Fetching place details for {}", place_id);

        let url = format!(
            "{}/details/json?place_id={}&key={}",
            self.base_url,
            urlencoding::encode(place_id),
            self.api_key()?
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| EstateAiError::upstream(format!("Place details request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(EstateAiError::upstream(format!(
                "Places API error: {}",
                response.status()
            )));
        }

        let body: DetailsResponse = response.json().await.map_err(|e| {
            EstateAiError::parse(format!("Failed to parse place details response: {e}"))
        })?;

        match body.status.as_str() {
            "OK" => Ok(body.result.map(|r| PlaceDetails {
                name: r.name,
                formatted_address: r.formatted_address,
            })),
            "ZERO_RESULTS" | "NOT_FOUND" => Ok(None),
            other => Err(EstateAiError::upstream(format!(
                "Places API returned status {other}"
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
        let client = GooglePlacesClient::new(&config);
        assert_eq!(client.base_url, "https://maps.googleapis.com/maps/api/place");
    }

    #[test]
    fn test_nearby_place_conversion() {
        let body = r#"{
            "status": "OK",
            "results": [{
                "name": "Kitsilano Secondary School",
                "types": ["school", "point_of_interest"],
                "vicinity": "2550 W 10th Ave, Vancouver",
                "geometry": {"location": {"lat": 49.2627, "lng": -123.1665}}
            }]
        }"#;
        let parsed: NearbySearchResponse = serde_json::from_str(body).unwrap();
        let candidate = PlaceCandidate::from(parsed.results.into_iter().next().unwrap());
        assert_eq!(candidate.name, "Kitsilano Secondary School");
        assert_eq!(candidate.categories, vec!["school", "point_of_interest"]);
        assert_eq!(candidate.address.as_deref(), Some("2550 W 10th Ave, Vancouver"));
    }

    #[test]
    fn test_missing_vicinity_deserializes_as_none() {
        let body = r#"{
            "status": "OK",
            "results": [{
                "name": "Unnamed Stop",
                "types": ["transit_station"],
                "geometry": {"location": {"lat": 49.0, "lng": -123.0}}
            }]
        }"#;
        let parsed: NearbySearchResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.results[0].vicinity.is_none());
    }
}
