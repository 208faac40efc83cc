//! Translation oracle trait and configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::record::LinguisticRecord;

/// Word field the oracle can fill on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillField {
    /// Words sharing the same root.
    RelatedForms,
    Synonyms,
}

impl fmt::Display for FillField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillField::RelatedForms => write!(f, "related forms"),
            FillField::Synonyms => write!(f, "synonyms"),
        }
    }
}

/// Configuration shared by oracle providers.
#[derive(Debug, Clone)]
pub struct OracleConfig {
    /// Model identifier passed to the provider.
    pub model: String,

    /// Token limit for lookups and field fills.
    pub max_tokens: usize,

    /// Token limit for one-line popup translations.
    pub translate_max_tokens: usize,

    /// Token limit for song explanations.
    pub explain_max_tokens: usize,

    /// Sampling temperature (0.0-1.0).
    pub temperature: f64,

    /// Language translations are requested in.
    pub target_language: String,

    /// HTTP timeout per request.
    pub timeout_secs: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 1024,
            translate_max_tokens: 100,
            explain_max_tokens: 2000,
            temperature: 0.3,
            target_language: "Russian".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Best-effort linguistic lookup service.
///
/// Implementations must be thread-safe (Send + Sync). Every answer is
/// advisory: callers keep their previous values when a call fails.
pub trait TranslationOracle: Send + Sync {
    /// Structured data for a word or phrase.
    fn lookup(&self, text: &str) -> Result<LinguisticRecord>;

    /// Short translation for a popup.
    fn translate(&self, text: &str) -> Result<String>;

    /// Free-form explanation of a song: meaning, metaphors, slang.
    fn explain_song(&self, title: &str, text: &str) -> Result<String>;

    /// Comma-joined list for one word field.
    fn fill_field(&self, word: &str, field: FillField) -> Result<String>;

    /// Get the configuration for this provider.
    fn config(&self) -> &OracleConfig;

    /// Provider name for logging.
    fn name(&self) -> &str;
}
