//! Place candidates, ranked results, and reference dataset records

use serde::{Deserialize, Serialize};

use super::location::Coordinate;

/// Raw point-of-interest record as returned by the place-search collaborator,
/// pre-filter and pre-rank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceCandidate {
    pub name: String,
    pub categories: Vec<String>,
    pub location: Coordinate,
    pub address: Option<String>,
}

/// Display label for a ranked place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceType {
    Park,
    CommunityCentre,
    School,
    TransitStation,
}

/// A deduplicated, distance-ranked place ready for presentation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedPlace {
    pub name: String,
    #[serde(rename = "type")]
    pub place_type: PlaceType,
    pub address: String,
    pub location: Coordinate,
    pub distance_m: u32,
    pub walking_time_min: u32,
    pub maps_url: String,
    pub rank: u32,
}

/// Geocoding result: the resolved position plus provider metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodedPlace {
    pub coordinate: Coordinate,
    pub formatted_address: String,
    pub place_id: String,
}

/// Detail record for a single place, fetched by provider place id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceDetails {
    pub name: String,
    pub formatted_address: Option<String>,
}

/// One row of the school catchment reference dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatchmentReferenceRecord {
    pub name: String,
    pub category: String,
    pub address: String,
    pub locality: String,
    pub location: Coordinate,
}

/// The single closest reference record to a query origin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearestMatch {
    pub record: CatchmentReferenceRecord,
    pub distance_km: f64,
}

/// Property assessment figures for a geocoded address.
///
/// Mirrors the persisted Assessment entity of the surrounding system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentData {
    pub property_address: String,
    pub assessed_value: String,
    pub land_value: String,
    pub improvement_value: String,
    pub assessment_year: u32,
    pub lat: f64,
    pub lng: f64,
}
