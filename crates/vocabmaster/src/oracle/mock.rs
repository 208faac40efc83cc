//! Mock oracle for testing.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError};

use crate::error::{Result, VocabError};

use super::provider::{FillField, OracleConfig, TranslationOracle};
use super::record::{LinguisticRecord, Meaning};

/// A request the mock received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OracleCall {
    Lookup(String),
    Translate(String),
    ExplainSong(String),
    FillField(String, FillField),
}

/// Oracle returning canned, predictable answers and recording every call.
///
/// Unknown texts translate to `"tr:<text>"`. Texts registered with
/// [`failing_on`](Self::failing_on) make every method return an error.
pub struct MockOracle {
    config: OracleConfig,
    records: HashMap<String, LinguisticRecord>,
    translations: HashMap<String, String>,
    fields: HashMap<(String, FillField), String>,
    failures: HashSet<String>,
    calls: Mutex<Vec<OracleCall>>,
}

impl MockOracle {
    pub fn new() -> Self {
        Self::with_config(OracleConfig::default())
    }

    pub fn with_config(config: OracleConfig) -> Self {
        Self {
            config,
            records: HashMap::new(),
            translations: HashMap::new(),
            fields: HashMap::new(),
            failures: HashSet::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Canned lookup answer for `text`.
    pub fn with_record(mut self, text: impl Into<String>, record: LinguisticRecord) -> Self {
        self.records.insert(text.into(), record);
        self
    }

    /// Canned popup translation for `text`.
    pub fn with_translation(mut self, text: impl Into<String>, translation: impl Into<String>) -> Self {
        self.translations.insert(text.into(), translation.into());
        self
    }

    /// Canned field fill for `word`.
    pub fn with_field(mut self, word: impl Into<String>, field: FillField, value: impl Into<String>) -> Self {
        self.fields.insert((word.into(), field), value.into());
        self
    }

    /// Make every request about `text` fail.
    pub fn failing_on(mut self, text: impl Into<String>) -> Self {
        self.failures.insert(text.into());
        self
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<OracleCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn record_call(&self, call: OracleCall, key: &str) -> Result<()> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
        if self.failures.contains(key) {
            return Err(VocabError::Oracle(format!("mock failure for \"{}\"", key)));
        }
        Ok(())
    }

    fn default_translation(text: &str) -> String {
        format!("tr:{}", text)
    }
}

impl Default for MockOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl TranslationOracle for MockOracle {
    fn lookup(&self, text: &str) -> Result<LinguisticRecord> {
        self.record_call(OracleCall::Lookup(text.to_string()), text)?;
        Ok(self.records.get(text).cloned().unwrap_or_else(|| LinguisticRecord {
            gloss_en: Some(format!("meaning of {}", text)),
            meanings: vec![Meaning {
                translation: Self::default_translation(text),
                gloss_en: None,
                example: Some(format!("An example with {}.", text)),
            }],
            ..LinguisticRecord::default()
        }))
    }

    fn translate(&self, text: &str) -> Result<String> {
        self.record_call(OracleCall::Translate(text.to_string()), text)?;
        Ok(self
            .translations
            .get(text)
            .cloned()
            .unwrap_or_else(|| Self::default_translation(text)))
    }

    fn explain_song(&self, title: &str, _text: &str) -> Result<String> {
        self.record_call(OracleCall::ExplainSong(title.to_string()), title)?;
        Ok(format!("\"{}\" is a song about practice.", title))
    }

    fn fill_field(&self, word: &str, field: FillField) -> Result<String> {
        self.record_call(OracleCall::FillField(word.to_string(), field), word)?;
        Ok(self
            .fields
            .get(&(word.to_string(), field))
            .cloned()
            .unwrap_or_else(|| match field {
                FillField::RelatedForms => format!("{0}s, {0}ed, {0}ing", word),
                FillField::Synonyms => format!("{}-like", word),
            }))
    }

    fn config(&self) -> &OracleConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_records_calls() {
        let oracle = MockOracle::new().with_translation("run", "бежать");
        assert_eq!(oracle.translate("run").unwrap(), "бежать");
        assert_eq!(oracle.translate("walk").unwrap(), "tr:walk");
        assert_eq!(
            oracle.calls(),
            vec![
                OracleCall::Translate("run".to_string()),
                OracleCall::Translate("walk".to_string())
            ]
        );
    }

    #[test]
    fn test_mock_failure() {
        let oracle = MockOracle::new().failing_on("broken");
        assert!(matches!(oracle.lookup("broken"), Err(VocabError::Oracle(_))));
        assert_eq!(oracle.call_count(), 1);
        assert_eq!(
            oracle.lookup("fine").unwrap().primary_translation(),
            Some("tr:fine")
        );
    }

    #[test]
    fn test_mock_fill_field() {
        let oracle = MockOracle::new().with_field("cook", FillField::RelatedForms, "cooker, cooking");
        assert_eq!(
            oracle.fill_field("cook", FillField::RelatedForms).unwrap(),
            "cooker, cooking"
        );
        assert_eq!(oracle.fill_field("fast", FillField::Synonyms).unwrap(), "fast-like");
    }
}
