//! Intent-tagged response envelopes returned by the query router
//!
//! Each envelope is a JSON-serializable structure with a `query` label and a
//! `data`/`results` payload; the parks envelope additionally carries a
//! `source` and `last_updated` date stamp.

use chrono::NaiveDate;
use serde::Serialize;

use super::place::{AssessmentData, RankedPlace};
use super::query::Intent;

/// Result of routing one query
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ResponseEnvelope {
    Places(PlacesEnvelope),
    Parks(ParksEnvelope),
    Catchment(CatchmentEnvelope),
    Assessment(AssessmentEnvelope),
    Unsupported(UnsupportedEnvelope),
    NotFound(NotFoundEnvelope),
}

/// Ranked place list for the schools and transit lookups
#[derive(Debug, Serialize)]
pub struct PlacesEnvelope {
    pub query: String,
    pub intent: Intent,
    pub data: Vec<RankedPlace>,
}

/// Dual ranked lists for the parks lookup, keyed separately
#[derive(Debug, Serialize)]
pub struct ParksEnvelope {
    pub query: String,
    pub intent: Intent,
    pub address: String,
    pub radius_m: u32,
    pub results: ParkResults,
    pub source: String,
    pub last_updated: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct ParkResults {
    pub parks: Vec<RankedPlace>,
    pub communities: Vec<RankedPlace>,
}

/// Nearest school catchment record, or a message when none was found
#[derive(Debug, Serialize)]
pub struct CatchmentEnvelope {
    pub query: String,
    pub intent: Intent,
    pub data: Option<CatchmentMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CatchmentMatch {
    pub school_name: String,
    pub category: String,
    pub address: String,
    pub geo_local_area: String,
    pub distance_km: f64,
}

/// Assessment figures for the geocoded property
#[derive(Debug, Serialize)]
pub struct AssessmentEnvelope {
    pub query: String,
    pub intent: Intent,
    pub data: AssessmentData,
}

/// Fixed envelope for queries outside the supported intent set, naming the
/// detected intent and extracted address for diagnostics
#[derive(Debug, Serialize)]
pub struct UnsupportedEnvelope {
    pub message: String,
    pub query: String,
    pub action_determined: Intent,
    pub address_extracted: Option<String>,
    pub hint: String,
}

/// Terminal "not found" result for extraction and geocoding failures
#[derive(Debug, Serialize)]
pub struct NotFoundEnvelope {
    pub query: String,
    pub intent: Intent,
    pub message: String,
}

impl ResponseEnvelope {
    /// Terminal envelope for a query whose address could not be extracted
    #[must_use]
    pub fn address_not_found(query_text: &str, intent: Intent) -> Self {
        ResponseEnvelope::NotFound(NotFoundEnvelope {
            query: query_text.to_string(),
            intent,
            message: "Unable to extract an address from the query.".to_string(),
        })
    }

    /// Terminal envelope for an address the geocoder could not resolve
    #[must_use]
    pub fn location_not_found(query_text: &str, intent: Intent) -> Self {
        ResponseEnvelope::NotFound(NotFoundEnvelope {
            query: query_text.to_string(),
            intent,
            message: "Unable to resolve the extracted address to a location.".to_string(),
        })
    }
}
