//! Query input, extracted addresses, and intent classification results

use serde::{Deserialize, Serialize};

/// A raw natural-language query, created per request and discarded after routing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Query {
    pub text: String,
}

impl Query {
    #[must_use]
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self { text: text.into() }
    }
}

/// Which stage of the extraction fallback chain produced the address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    RegexStreet,
    RegexPostal,
    CityMatch,
    RegexIntersection,
    Llm,
}

/// A best-effort address pulled out of the query text.
///
/// The value is always non-empty; a failed extraction is represented by the
/// absence of this struct, which short-circuits downstream geocoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedAddress {
    /// The query text the address was extracted from
    pub raw_text: String,
    pub method: ExtractionMethod,
    pub value: String,
}

impl ExtractedAddress {
    #[must_use]
    pub fn new<R: Into<String>, V: Into<String>>(
        raw_text: R,
        method: ExtractionMethod,
        value: V,
    ) -> Self {
        Self {
            raw_text: raw_text.into(),
            method,
            value: value.into(),
        }
    }
}

/// The closed set of query categories the router can dispatch to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Schools,
    SchoolCatchment,
    Transit,
    Parks,
    Assessment,
    Unsupported,
}

impl Intent {
    /// Map a classifier token to an intent. Anything outside the closed set
    /// maps to `Unsupported` so the router never dispatches to an undefined
    /// handler.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        match token {
            "schools" => Intent::Schools,
            "school_catchment" => Intent::SchoolCatchment,
            "transit" => Intent::Transit,
            "parks" => Intent::Parks,
            "assessment" => Intent::Assessment,
            _ => Intent::Unsupported,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Schools => "schools",
            Intent::SchoolCatchment => "school_catchment",
            Intent::Transit => "transit",
            Intent::Parks => "parks",
            Intent::Assessment => "assessment",
            Intent::Unsupported => "unsupported",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_token_round_trip() {
        for intent in [
            Intent::Schools,
            Intent::SchoolCatchment,
            Intent::Transit,
            Intent::Parks,
            Intent::Assessment,
            Intent::Unsupported,
        ] {
            assert_eq!(Intent::from_token(intent.as_str()), intent);
        }
    }

    #[test]
    fn test_unknown_token_maps_to_unsupported() {
        assert_eq!(Intent::from_token("restaurants"), Intent::Unsupported);
        assert_eq!(Intent::from_token(""), Intent::Unsupported);
        assert_eq!(Intent::from_token("Schools"), Intent::Unsupported);
    }
}
