//! Anthropic Claude API provider.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::{Result, VocabError};

use super::prompts;
use super::provider::{FillField, OracleConfig, TranslationOracle};
use super::record::{parse_fill_field, LinguisticRecord};

/// Anthropic API endpoint.
const API_URL: &str = "https://api.anthropic.com/v1/messages";

/// Anthropic API version.
const API_VERSION: &str = "2023-06-01";

/// Anthropic Claude oracle.
pub struct AnthropicOracle {
    client: Client,
    api_key: String,
    config: OracleConfig,
}

impl AnthropicOracle {
    /// Create a new Anthropic provider with the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, OracleConfig::default())
    }

    /// Create a new Anthropic provider with custom configuration.
    pub fn with_config(api_key: impl Into<String>, config: OracleConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| VocabError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
        })
    }

    /// Create from the `ANTHROPIC_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY").map_err(|_| {
            VocabError::Config("ANTHROPIC_API_KEY environment variable not set".to_string())
        })?;
        Self::new(api_key)
    }

    /// Use another model with the same settings.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&self.api_key)
                .map_err(|e| VocabError::Config(format!("Invalid API key: {}", e)))?,
        );
        headers.insert("anthropic-version", HeaderValue::from_static(API_VERSION));
        Ok(headers)
    }

    fn send_message(&self, user_prompt: &str, max_tokens: usize) -> Result<String> {
        let body = json!({
            "model": self.config.model,
            "max_tokens": max_tokens,
            "temperature": self.config.temperature,
            "system": prompts::system_prompt(),
            "messages": [
                {
                    "role": "user",
                    "content": user_prompt
                }
            ]
        });

        debug!(model = %self.config.model, "anthropic request");
        let response = self
            .client
            .post(API_URL)
            .headers(self.build_headers()?)
            .json(&body)
            .send()
            .map_err(|e| VocabError::Oracle(format!("API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();
            return Err(VocabError::Oracle(format!(
                "API error ({}): {}",
                status, error_text
            )));
        }

        let api_response: ApiResponse = response
            .json()
            .map_err(|e| VocabError::OracleParse(format!("Failed to parse API response: {}", e)))?;

        api_response
            .content
            .into_iter()
            .find_map(|block| (block.content_type == "text").then_some(block.text))
            .ok_or_else(|| VocabError::OracleParse("No text in API response".to_string()))
    }
}

impl TranslationOracle for AnthropicOracle {
    fn lookup(&self, text: &str) -> Result<LinguisticRecord> {
        let prompt = prompts::lookup_prompt(text, &self.config.target_language);
        let response = self.send_message(&prompt, self.config.max_tokens)?;
        LinguisticRecord::parse(&response)
    }

    fn translate(&self, text: &str) -> Result<String> {
        let prompt = prompts::translate_prompt(text, &self.config.target_language);
        let response = self.send_message(&prompt, self.config.translate_max_tokens)?;
        Ok(response.trim().to_string())
    }

    fn explain_song(&self, title: &str, text: &str) -> Result<String> {
        let prompt = prompts::explain_song_prompt(title, text, &self.config.target_language);
        let response = self.send_message(&prompt, self.config.explain_max_tokens)?;
        Ok(response.trim().to_string())
    }

    fn fill_field(&self, word: &str, field: FillField) -> Result<String> {
        let prompt = prompts::fill_field_prompt(word, field);
        let response = self.send_message(&prompt, self.config.max_tokens)?;
        parse_fill_field(&response, field)
    }

    fn config(&self) -> &OracleConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "anthropic"
    }
}

/// Anthropic API response structure.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    content: Vec<ContentBlock>,
}

/// Content block in API response.
#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_api_response() {
        let raw = r#"{"content":[{"type":"text","text":"{\"type\": \"noun\"}"}]}"#;
        let parsed: ApiResponse = serde_json::from_str(raw).unwrap();
        let record = LinguisticRecord::parse(&parsed.content[0].text).unwrap();
        assert_eq!(record.word_class, Some(crate::model::WordClass::Noun));
    }

    #[test]
    fn test_headers_carry_version() {
        let provider = AnthropicOracle::new("test").unwrap();
        let headers = provider.build_headers().unwrap();
        assert_eq!(headers["anthropic-version"], API_VERSION);
        assert_eq!(headers["x-api-key"], "test");
    }
}
