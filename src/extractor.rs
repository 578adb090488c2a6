//! Address extraction from raw query text
//!
//! Ordered, short-circuiting fallback chain: street pattern, Canadian postal
//! code, city gazetteer containment, intersection pattern, and finally a
//! constrained language-model completion. Each stage runs only when the
//! previous one found nothing. The LLM output is used verbatim after
//! trimming; downstream geocoding is the real validator.

use std::sync::Arc;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::EstateAiError;
use crate::models::{ExtractedAddress, ExtractionMethod};
use crate::services::LanguageModelService;
use crate::Result;

/// Locality gazetteer, in match-priority order. Containment is checked entry
/// by entry, so "Vancouver" wins over "West Vancouver" whenever both appear.
pub const CITY_GAZETTEER: [&str; 9] = [
    "Vancouver",
    "West Vancouver",
    "North Vancouver",
    "Burnaby",
    "Richmond",
    "Surrey",
    "Coquitlam",
    "Delta",
    "Langley",
];

static STREET_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b\d{1,5}\s+[A-Za-z0-9]+(?:\s[A-Za-z0-9]+){0,4}\b(?:\s(?:St|Street|Avenue|Ave|Rd|Road|Blvd|Boulevard|Lane|Ln|Drive|Dr|Court|Ct|Way))?",
    )
    .expect("street pattern is valid")
});

static POSTAL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    // Canadian postal code; the first letter set excludes codes never issued
    Regex::new(r"(?i)\b[ABCEGHJKLMNPRSTVXY]\d[ABCEGHJKLMNPRSTVWXYZ][ -]?\d[ABCEGHJKLMNPRSTVWXYZ]\d\b")
        .expect("postal pattern is valid")
});

static INTERSECTION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Za-z0-9]+)\s*&\s*([A-Za-z0-9]+)\b").expect("intersection pattern is valid")
});

const EXTRACTION_SYSTEM_PROMPT: &str = "You are a real estate assistant. Extract only the \
    property address, street, city, or postal code from the user query. Do not add any extra \
    text, explanation, or punctuation.";

const EXTRACTION_MAX_TOKENS: u32 = 30;

/// Turns raw query text into a best-effort address string
pub struct AddressExtractor {
    llm: Arc<dyn LanguageModelService>,
}

impl AddressExtractor {
    #[must_use]
    pub fn new(llm: Arc<dyn LanguageModelService>) -> Self {
        Self { llm }
    }

    /// Run the full fallback chain. `Ok(None)` means no address was found and
    /// the caller must treat the query as unanswerable, not retry.
    ///
    /// An unavailable language model during the fallback stage surfaces as an
    /// extraction error.
    pub async fn extract(&self, text: &str) -> Result<Option<ExtractedAddress>> {
        if let Some(found) = Self::extract_deterministic(text) {
            debug!("Extracted address '{}' via {:?}", found.value, found.method);
            return Ok(Some(found));
        }

        let completion = self
            .llm
            .complete(
                EXTRACTION_SYSTEM_PROMPT,
                &format!("User query: {text}\nAddress:"),
                EXTRACTION_MAX_TOKENS,
            )
            .await
            .map_err(|e| {
                EstateAiError::extraction(format!("language model fallback unavailable: {e}"))
            })?;

        let value = completion.trim();
        if value.is_empty() {
            debug!("Language model fallback returned no address");
            return Ok(None);
        }

        debug!("Extracted address '{}' via language model", value);
        Ok(Some(ExtractedAddress::new(text, ExtractionMethod::Llm, value)))
    }

    /// The deterministic stages of the chain, in order
    #[must_use]
    pub fn extract_deterministic(text: &str) -> Option<ExtractedAddress> {
        if let Some(found) = STREET_PATTERN.find(text) {
            return Some(ExtractedAddress::new(
                text,
                ExtractionMethod::RegexStreet,
                found.as_str(),
            ));
        }

        if let Some(found) = POSTAL_PATTERN.find(text) {
            return Some(ExtractedAddress::new(
                text,
                ExtractionMethod::RegexPostal,
                found.as_str(),
            ));
        }

        let lowered = text.to_lowercase();
        for city in CITY_GAZETTEER {
            if lowered.contains(&city.to_lowercase()) {
                return Some(ExtractedAddress::new(text, ExtractionMethod::CityMatch, city));
            }
        }

        if let Some(found) = INTERSECTION_PATTERN.find(text) {
            return Some(ExtractedAddress::new(
                text,
                ExtractionMethod::RegexIntersection,
                found.as_str(),
            ));
        }

        None
    }
}
