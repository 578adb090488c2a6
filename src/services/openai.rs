//! OpenAI chat completions client
//!
//! Completions are POST requests and are never retried; a failed call is a
//! failed call, and the pipeline decides per call site how to degrade.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::LanguageModelService;
use crate::config::EstateAiConfig;
use crate::error::EstateAiError;
use crate::Result;

/// Chat completions client for the configured language model
pub struct OpenAiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl OpenAiClient {
    /// Create a new client from application config
    #[must_use]
    pub fn new(config: &EstateAiConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(u64::from(config.llm.timeout_seconds)))
            .user_agent(concat!("EstateAI/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key: config.llm.api_key.clone(),
            base_url: config.llm.base_url.clone(),
            model: config.llm.model.clone(),
        }
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| EstateAiError::config("Language model API key is not configured"))
    }
}

#[async_trait]
impl LanguageModelService for OpenAiClient {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: u32,
    ) -> Result<String> {
        debug!("Requesting completion from model {}", self.model);

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(self.api_key()?)
            .json(&request)
            .send()
            .await
            .map_err(|e| EstateAiError::upstream(format!("Completion request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(EstateAiError::upstream(format!(
                "Completion API error: {}",
                response.status()
            )));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| EstateAiError::parse(format!("Failed to parse completion response: {e}")))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| EstateAiError::parse("Completion response had no choices"))?;

        Ok(content)
    }
}
