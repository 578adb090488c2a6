//! External collaborator interfaces and their production HTTP bindings
//!
//! Every collaborator is abstracted as a capability trait so the pipeline is
//! testable without network access, and so the production bindings stay
//! swappable. Constructors take the application config; there is no global
//! API-key state.

pub mod google_geocoding;
pub mod google_places;
pub mod openai;
pub mod vancouver_open_data;

use std::time::Duration;

use async_trait::async_trait;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};

use crate::Result;
use crate::models::{
    CatchmentReferenceRecord, Coordinate, GeocodedPlace, PlaceCandidate, PlaceDetails,
};

pub use google_geocoding::GoogleGeocodingClient;
pub use google_places::GooglePlacesClient;
pub use openai::OpenAiClient;
pub use vancouver_open_data::VancouverOpenDataClient;

/// Maps a free-text address to coordinates and provider metadata
#[async_trait]
pub trait GeocodingService: Send + Sync {
    /// Resolve an address string; `Ok(None)` means the provider had no match.
    async fn geocode(&self, address: &str) -> Result<Option<GeocodedPlace>>;
}

/// Point-of-interest search around an origin
#[async_trait]
pub trait PlaceSearchService: Send + Sync {
    /// Fetch raw candidates of one category within a radius of the origin.
    async fn search_nearby(
        &self,
        origin: Coordinate,
        category: &str,
        radius_m: u32,
        keyword: Option<&str>,
    ) -> Result<Vec<PlaceCandidate>>;

    /// Fetch the detail record for a provider place id.
    async fn place_details(&self, place_id: &str) -> Result<Option<PlaceDetails>>;
}

/// Reference dataset access for school catchment records
#[async_trait]
pub trait OpenDataService: Send + Sync {
    /// Fetch the full catchment reference dataset in a fixed order.
    async fn fetch_school_catchment_records(&self) -> Result<Vec<CatchmentReferenceRecord>>;
}

/// Constrained text completion against a language model
#[async_trait]
pub trait LanguageModelService: Send + Sync {
    /// Run one system+user prompt pair and return the raw completion text.
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: u32,
    ) -> Result<String>;
}

/// Build an HTTP client that retries idempotent GETs on transient network
/// errors only; 4xx responses are never retried.
pub(crate) fn retrying_client(timeout_seconds: u32, max_retries: u32) -> ClientWithMiddleware {
    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(max_retries);
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(u64::from(timeout_seconds)))
        .user_agent(concat!("EstateAI/", env!("CARGO_PKG_VERSION")))
        .build()
        .expect("Failed to create HTTP client");

    ClientBuilder::new(client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build()
}
