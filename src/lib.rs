//! `EstateAI` - Natural-language real estate query resolution
//!
//! This library provides the core query pipeline: intent classification,
//! address extraction with a deterministic-then-probabilistic fallback chain,
//! and nearby-candidate aggregation with distance ranking, fed by external
//! geodata collaborators.

pub mod aggregator;
pub mod catchment;
pub mod config;
pub mod error;
pub mod extractor;
pub mod geomath;
pub mod intent;
pub mod models;
pub mod router;
pub mod services;

// Re-export core types for public API
pub use config::EstateAiConfig;
pub use error::EstateAiError;
pub use extractor::AddressExtractor;
pub use intent::IntentClassifier;
pub use models::{
    Coordinate, ExtractedAddress, ExtractionMethod, Intent, PlaceCandidate, Query, RankedPlace,
    ResponseEnvelope,
};
pub use router::QueryRouter;
pub use services::{
    GeocodingService, GoogleGeocodingClient, GooglePlacesClient, LanguageModelService,
    OpenAiClient, OpenDataService, PlaceSearchService, VancouverOpenDataClient,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, EstateAiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
