//! Intent classification for incoming queries
//!
//! One classifier, two stages: a deterministic rule pass over the lowered
//! query text, then a constrained language-model completion when no rule
//! fires. The instruction surface and the enum stay closed so the router can
//! never dispatch to an undefined downstream handler.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::models::Intent;
use crate::services::LanguageModelService;

const CLASSIFY_SYSTEM_PROMPT: &str = "You are an intelligent assistant that maps natural \
    language queries to API endpoints for a real estate assistant app.\n\n\
    Available endpoints:\n\
    - 'schools': For nearby schools queries\n\
    - 'school_catchment': For school catchment area queries\n\
    - 'transit': For nearby transit, bus stops, skytrain stations\n\
    - 'parks': For nearby parks, community centres, trails, recreation\n\
    - 'assessment': For BC assessment value, property value queries\n\
    - 'unsupported': For any other query type (hospitals, restaurants, etc.)\n\n\
    Respond ONLY with the endpoint name from the list above. \
    Do not include any explanation or extra text.";

const CLASSIFY_MAX_TOKENS: u32 = 20;

/// Maps raw query text to one of the closed intent set
pub struct IntentClassifier {
    llm: Arc<dyn LanguageModelService>,
}

impl IntentClassifier {
    #[must_use]
    pub fn new(llm: Arc<dyn LanguageModelService>) -> Self {
        Self { llm }
    }

    /// Classify a query. Rule stage first; the language model only sees
    /// queries no rule could place. An unavailable model degrades to
    /// `Unsupported` rather than failing the query.
    pub async fn classify(&self, text: &str) -> Intent {
        if let Some(intent) = Self::classify_by_rules(text) {
            debug!("Rule stage classified query as {}", intent.as_str());
            return intent;
        }

        match self
            .llm
            .complete(
                CLASSIFY_SYSTEM_PROMPT,
                &format!("User query: {text}\n\nWhich endpoint?"),
                CLASSIFY_MAX_TOKENS,
            )
            .await
        {
            Ok(token) => {
                let intent = Intent::from_token(token.trim().to_lowercase().as_str());
                debug!(
                    "Language model classified query as {} (token '{}')",
                    intent.as_str(),
                    token.trim()
                );
                intent
            }
            Err(e) => {
                warn!("Intent classification unavailable, treating as unsupported: {e}");
                Intent::Unsupported
            }
        }
    }

    /// Deterministic keyword pass. "catchment" is checked before "school"
    /// because every catchment query also mentions schools.
    #[must_use]
    pub fn classify_by_rules(text: &str) -> Option<Intent> {
        let lowered = text.to_lowercase();

        if lowered.contains("catchment") {
            return Some(Intent::SchoolCatchment);
        }
        if lowered.contains("school") {
            return Some(Intent::Schools);
        }
        if ["transit", "skytrain", "bus stop", "bus station", "train station"]
            .iter()
            .any(|keyword| lowered.contains(keyword))
        {
            return Some(Intent::Transit);
        }
        if ["park", "playground", "trail", "community centre", "community center", "recreation"]
            .iter()
            .any(|keyword| lowered.contains(keyword))
        {
            return Some(Intent::Parks);
        }
        if ["assessment", "assessed", "property value"]
            .iter()
            .any(|keyword| lowered.contains(keyword))
        {
            return Some(Intent::Assessment);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use rstest::rstest;

    use super::*;
    use crate::error::EstateAiError;
    use crate::Result;

    struct StubLlm {
        reply: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl StubLlm {
        fn replying(reply: &'static str) -> Self {
            Self {
                reply: Some(reply),
                calls: AtomicUsize::new(0),
            }
        }

        fn unavailable() -> Self {
            Self {
                reply: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl LanguageModelService for StubLlm {
        async fn complete(&self, _system: &str, _user: &str, _max_tokens: u32) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.reply {
                Some(reply) => Ok(reply.to_string()),
                None => Err(EstateAiError::upstream("connection refused")),
            }
        }
    }

    #[rstest]
    #[case("which school catchment is 123 Main St in?", Intent::SchoolCatchment)]
    #[case("schools near 2150 Balsam St", Intent::Schools)]
    #[case("closest skytrain to Burnaby", Intent::Transit)]
    #[case("any playgrounds around V6K 3M2?", Intent::Parks)]
    #[case("what's the assessed value of 123 Main St?", Intent::Assessment)]
    fn test_rule_stage(#[case] text: &str, #[case] expected: Intent) {
        assert_eq!(IntentClassifier::classify_by_rules(text), Some(expected));
    }

    #[test]
    fn test_rule_stage_abstains_on_unknown() {
        assert_eq!(
            IntentClassifier::classify_by_rules("tell me about 123 Main St"),
            None
        );
    }

    #[tokio::test]
    async fn test_rule_hit_skips_llm() {
        let llm = Arc::new(StubLlm::replying("parks"));
        let classifier = IntentClassifier::new(llm.clone());

        let intent = classifier.classify("schools near 2150 Balsam St").await;
        assert_eq!(intent, Intent::Schools);
        assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_llm_token_mapped_to_intent() {
        let llm = Arc::new(StubLlm::replying("  Transit \n"));
        let classifier = IntentClassifier::new(llm.clone());

        let intent = classifier.classify("how do I get downtown from 123 Main St").await;
        assert_eq!(intent, Intent::Transit);
        assert_eq!(llm.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_out_of_set_token_is_unsupported() {
        let llm = Arc::new(StubLlm::replying("restaurants"));
        let classifier = IntentClassifier::new(llm);

        let intent = classifier.classify("sushi near 123 Main St").await;
        assert_eq!(intent, Intent::Unsupported);
    }

    #[tokio::test]
    async fn test_unavailable_llm_degrades_to_unsupported() {
        let llm = Arc::new(StubLlm::unavailable());
        let classifier = IntentClassifier::new(llm);

        let intent = classifier.classify("tell me about 123 Main St").await;
        assert_eq!(intent, Intent::Unsupported);
    }
}
