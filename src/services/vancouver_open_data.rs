//! Vancouver Open Data client for the school catchment reference dataset

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{OpenDataService, retrying_client};
use crate::config::EstateAiConfig;
use crate::error::EstateAiError;
use crate::models::{CatchmentReferenceRecord, Coordinate};
use crate::Result;

/// Open-data client for the city `schools` dataset.
///
/// The portal returns records in a stable catalog order; callers that need
/// reproducible tie-breaking in nearest-match scans rely on that order being
/// preserved here.
pub struct VancouverOpenDataClient {
    client: ClientWithMiddleware,
    base_url: String,
    record_limit: u32,
}

#[derive(Debug, Deserialize)]
struct RecordsResponse {
    #[serde(default)]
    results: Vec<SchoolRecord>,
}

#[derive(Debug, Deserialize)]
struct SchoolRecord {
    school_name: Option<String>,
    school_category: Option<String>,
    address: Option<String>,
    geo_local_area: Option<String>,
    geo_point_2d: Option<GeoPoint>,
}

#[derive(Debug, Deserialize)]
struct GeoPoint {
    lat: f64,
    lon: f64,
}

impl VancouverOpenDataClient {
    /// Create a new client from application config
    #[must_use]
    pub fn new(config: &EstateAiConfig) -> Self {
        Self {
            client: retrying_client(
                config.open_data.timeout_seconds,
                config.open_data.max_retries,
            ),
            base_url: config.open_data.base_url.clone(),
            record_limit: config.open_data.record_limit,
        }
    }
}

impl SchoolRecord {
    /// Convert to a reference record; rows without a position are unusable
    fn into_reference_record(self) -> Option<CatchmentReferenceRecord> {
        let point = self.geo_point_2d?;
        Some(CatchmentReferenceRecord {
            name: self.school_name?,
            category: self.school_category.unwrap_or_default(),
            address: self.address.unwrap_or_default(),
            locality: self.geo_local_area.unwrap_or_default(),
            location: Coordinate::new(point.lat, point.lon),
        })
    }
}

#[async_trait]
impl OpenDataService for VancouverOpenDataClient {
    async fn fetch_school_catchment_records(&self) -> Result<Vec<CatchmentReferenceRecord>> {
        let url = format!(
            "{}/api/explore/v2.1/catalog/datasets/schools/records?limit={}",
            self.base_url, self.record_limit
        );
        debug!("Fetching school catchment records from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| EstateAiError::upstream(format!("Open-data request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(EstateAiError::upstream(format!(
                "Open-data API error: {}",
                response.status()
            )));
        }

        let body: RecordsResponse = response
            .json()
            .await
            .map_err(|e| EstateAiError::parse(format!("Failed to parse open-data response: {e}")))?;

        let total = body.results.len();
        let records: Vec<CatchmentReferenceRecord> = body
            .results
            .into_iter()
            .filter_map(SchoolRecord::into_reference_record)
            .collect();

        if records.len() < total {
            warn!(
                "Dropped {} school records without usable name or position",
                total - records.len()
            );
        }
        info!("Fetched {} school catchment records", records.len());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let config = EstateAiConfig::default();
        let client = VancouverOpenDataClient::new(&config);
        assert_eq!(client.base_url, "https://opendata.vancouver.ca");
        assert_eq!(client.record_limit, 194);
    }

    #[test]
    fn test_record_conversion() {
        let body = r#"{
            "results": [{
                "school_name": "Lord Tennyson Elementary",
                "school_category": "Public School",
                "address": "1936 W 10th Ave",
                "geo_local_area": "Kitsilano",
                "geo_point_2d": {"lat": 49.2634, "lon": -123.1512}
            }]
        }"#;
        let parsed: RecordsResponse = serde_json::from_str(body).unwrap();
        let record = parsed
            .results
            .into_iter()
            .next()
            .unwrap()
            .into_reference_record()
            .unwrap();
        assert_eq!(record.name, "Lord Tennyson Elementary");
        assert_eq!(record.locality, "Kitsilano");
        assert_eq!(record.location.lng, -123.1512);
    }

    #[test]
    fn test_record_without_position_is_dropped() {
        let body = r#"{
            "results": [{
                "school_name": "Ghost School",
                "school_category": "Public School",
                "address": null,
                "geo_local_area": null,
                "geo_point_2d": null
            }]
        }"#;
        let parsed: RecordsResponse = serde_json::from_str(body).unwrap();
        assert!(parsed
            .results
            .into_iter()
            .next()
            .unwrap()
            .into_reference_record()
            .is_none());
    }
}
