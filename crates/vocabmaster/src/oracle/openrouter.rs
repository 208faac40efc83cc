//! OpenRouter (OpenAI-compatible chat completions) provider.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::{Result, VocabError};

use super::prompts;
use super::provider::{FillField, OracleConfig, TranslationOracle};
use super::record::{parse_fill_field, LinguisticRecord};

/// OpenRouter API endpoint.
const API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default OpenRouter model.
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash-lite";

const REFERER: &str = "https://vocabmaster.vercel.app";
const APP_TITLE: &str = "VocabMaster";

/// Oracle backed by any OpenAI-compatible chat-completions endpoint.
pub struct OpenRouterOracle {
    client: Client,
    api_key: String,
    api_url: String,
    config: OracleConfig,
}

impl OpenRouterOracle {
    /// Create a provider with the default OpenRouter model.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let config = OracleConfig {
            model: DEFAULT_MODEL.to_string(),
            ..OracleConfig::default()
        };
        Self::with_config(api_key, config)
    }

    /// Create a provider with custom configuration.
    pub fn with_config(api_key: impl Into<String>, config: OracleConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| VocabError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            api_url: API_URL.to_string(),
            config,
        })
    }

    /// Create from the `OPENROUTER_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENROUTER_API_KEY").map_err(|_| {
            VocabError::Config("OPENROUTER_API_KEY environment variable not set".to_string())
        })?;
        Self::new(api_key)
    }

    /// Use another model with the same settings.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Point at another OpenAI-compatible endpoint.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|e| VocabError::Config(format!("Invalid API key: {}", e)))?,
        );
        headers.insert("HTTP-Referer", HeaderValue::from_static(REFERER));
        headers.insert("X-Title", HeaderValue::from_static(APP_TITLE));
        Ok(headers)
    }

    fn send_message(&self, user_prompt: &str, max_tokens: usize) -> Result<String> {
        let body = json!({
            "model": self.config.model,
            "max_tokens": max_tokens,
            "temperature": self.config.temperature,
            "messages": [
                {
                    "role": "system",
                    "content": prompts::system_prompt()
                },
                {
                    "role": "user",
                    "content": user_prompt
                }
            ]
        });

        debug!(model = %self.config.model, "openrouter request");
        let response = self
            .client
            .post(&self.api_url)
            .headers(self.build_headers()?)
            .json(&body)
            .send()
            .map_err(|e| VocabError::Oracle(format!("API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();
            return Err(VocabError::Oracle(format!(
                "OpenRouter API error ({}): {}",
                status, error_text
            )));
        }

        let api_response: ChatResponse = response
            .json()
            .map_err(|e| VocabError::OracleParse(format!("Failed to parse API response: {}", e)))?;

        api_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| VocabError::OracleParse("No response from OpenRouter".to_string()))
    }
}

impl TranslationOracle for OpenRouterOracle {
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
        "openrouter"
    }
}

/// Chat-completions response.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model() {
        let provider = OpenRouterOracle::new("test-key").unwrap();
        assert_eq!(provider.config().model, DEFAULT_MODEL);
        assert_eq!(provider.name(), "openrouter");

        let provider = provider.with_model("openai/gpt-4o-mini");
        assert_eq!(provider.config().model, "openai/gpt-4o-mini");
        assert_eq!(provider.config().max_tokens, OracleConfig::default().max_tokens);
    }

    #[test]
    fn test_headers() {
        let provider = OpenRouterOracle::new("test-key").unwrap();
        let headers = provider.build_headers().unwrap();
        assert_eq!(headers[AUTHORIZATION], "Bearer test-key");
        assert_eq!(headers["X-Title"], APP_TITLE);
    }

    #[test]
    fn test_parse_chat_response() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"бежать"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("бежать"));
    }
}
