//! Data models for the EstateAI query pipeline
//!
//! All types here are value objects created fresh per request:
//! - Location: geographic coordinate value type
//! - Query: raw query input, extraction results, intent enum
//! - Place: candidates, ranked results, catchment and assessment records
//! - Envelope: intent-tagged response shapes

pub mod envelope;
pub mod location;
pub mod place;
pub mod query;

// Re-export all public types for convenient access
pub use envelope::{
    AssessmentEnvelope, CatchmentEnvelope, CatchmentMatch, NotFoundEnvelope, ParkResults,
    ParksEnvelope, PlacesEnvelope, ResponseEnvelope, UnsupportedEnvelope,
};
pub use location::Coordinate;
pub use place::{
    AssessmentData, CatchmentReferenceRecord, GeocodedPlace, NearestMatch, PlaceCandidate,
    PlaceDetails, PlaceType, RankedPlace,
};
pub use query::{ExtractedAddress, ExtractionMethod, Intent, Query};
