//! Partial linguistic record returned by an oracle lookup.
//!
//! Oracle output is loosely shaped and versioned independently of this
//! crate, so it is parsed field by field: anything missing, empty, or of the
//! wrong type becomes `None` instead of failing the whole record.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, VocabError};
use crate::model::{Level, WordClass};

use super::provider::FillField;

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)```(?:json)?\s*").unwrap());

static JSON_OBJECT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

/// One sense of a word.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meaning {
    pub translation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gloss_en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

/// Everything an oracle may know about a word. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinguisticRecord {
    pub word_class: Option<WordClass>,
    pub level: Option<Level>,
    pub phonetic: Option<String>,
    pub gloss_en: Option<String>,
    /// Top-level translation, when the provider gives one outside `meanings`.
    pub translation: Option<String>,
    pub example: Option<String>,
    #[serde(default)]
    pub meanings: Vec<Meaning>,
    pub related_forms: Option<String>,
    pub synonyms: Option<String>,
}

impl LinguisticRecord {
    /// Parse raw oracle output.
    pub fn parse(raw: &str) -> Result<Self> {
        let object = extract_object(raw)?;
        Ok(Self::from_object(&object))
    }

    fn from_object(object: &Map<String, Value>) -> Self {
        let meanings = object
            .get("meanings")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(parse_meaning).collect())
            .unwrap_or_default();

        Self {
            word_class: text_field(object, &["word_class", "type", "wordClass"])
                .and_then(|s| s.parse().ok()),
            level: text_field(object, &["level"]).and_then(|s| s.parse().ok()),
            phonetic: text_field(object, &["phonetic"]),
            gloss_en: text_field(object, &["gloss_en", "meaningEn", "definition"]),
            translation: text_field(object, &["translation", "meaningRu", "ru"]),
            example: text_field(object, &["example"]),
            meanings,
            related_forms: list_field(object, &["related_forms", "singleRootWords", "forms"]),
            synonyms: list_field(object, &["synonyms"]),
        }
    }

    /// Top-level translation, else the first meaning's.
    pub fn primary_translation(&self) -> Option<&str> {
        self.translation
            .as_deref()
            .or_else(|| self.meanings.first().map(|m| m.translation.as_str()))
    }

    /// Top-level example, else the first meaning's.
    pub fn primary_example(&self) -> Option<&str> {
        self.example
            .as_deref()
            .or_else(|| self.meanings.first().and_then(|m| m.example.as_deref()))
    }

    /// Every translation offered, top-level first.
    pub fn translations(&self) -> Vec<&str> {
        self.translation
            .as_deref()
            .into_iter()
            .chain(self.meanings.iter().map(|m| m.translation.as_str()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Parse a field-fill answer: `{"words": ...}` or `{"synonyms": ...}`.
pub fn parse_fill_field(raw: &str, field: FillField) -> Result<String> {
    let object = extract_object(raw)?;
    let keys: &[&str] = match field {
        FillField::RelatedForms => &["words", "related_forms", "singleRootWords"],
        FillField::Synonyms => &["synonyms", "words"],
    };
    list_field(&object, keys)
        .ok_or_else(|| VocabError::OracleParse(format!("no {} in oracle response", field)))
}

/// Strip code fences and pull out the outermost JSON object.
pub fn extract_json(raw: &str) -> Option<String> {
    let cleaned = CODE_FENCE.replace_all(raw, "");
    JSON_OBJECT
        .find(cleaned.trim())
        .map(|m| m.as_str().to_string())
}

fn extract_object(raw: &str) -> Result<Map<String, Value>> {
    let json = extract_json(raw)
        .ok_or_else(|| VocabError::OracleParse("no JSON object in oracle response".to_string()))?;
    match serde_json::from_str::<Value>(&json) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) => Err(VocabError::OracleParse(
            "oracle response is not a JSON object".to_string(),
        )),
        Err(e) => Err(VocabError::OracleParse(e.to_string())),
    }
}

fn parse_meaning(value: &Value) -> Option<Meaning> {
    let object = value.as_object()?;
    let translation = text_field(object, &["translation", "ru", "meaningRu"])?;
    Some(Meaning {
        translation,
        gloss_en: text_field(object, &["gloss_en", "meaningEn"]),
        example: text_field(object, &["example"]),
    })
}

fn text_field(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| object.get(*k))
        .find_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// A comma-joined string, or an array of strings joined with ", ".
fn list_field(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().filter_map(|k| object.get(*k)).find_map(|v| {
        let joined = match v {
            Value::String(s) => s.trim().to_string(),
            Value::Array(items) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
            _ => return None,
        };
        (!joined.is_empty()).then_some(joined)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_legacy_shape() {
        let raw = r#"```json
{
  "type": "verb",
  "level": "b2",
  "phonetic": "/ɹʌn/",
  "meaningEn": "move fast on foot",
  "meanings": [
    {"ru": "бежать", "example": "I run every day."},
    {"ru": "управлять", "meaningEn": "manage"}
  ],
  "singleRootWords": ["runner", "running"],
  "synonyms": "sprint, dash"
}
```"#;
        let record = LinguisticRecord::parse(raw).unwrap();
        assert_eq!(record.word_class, Some(WordClass::Verb));
        assert_eq!(record.level, Some(Level::B2));
        assert_eq!(record.gloss_en.as_deref(), Some("move fast on foot"));
        assert_eq!(record.primary_translation(), Some("бежать"));
        assert_eq!(record.primary_example(), Some("I run every day."));
        assert_eq!(record.translations(), vec!["бежать", "управлять"]);
        assert_eq!(record.related_forms.as_deref(), Some("runner, running"));
        assert_eq!(record.synonyms.as_deref(), Some("sprint, dash"));
    }

    #[test]
    fn test_unknown_values_become_none() {
        let raw = r#"Sure! {"type": "noun/verb", "level": "Z9", "phonetic": "", "meanings": [42, {"example": "no translation"}]}"#;
        let record = LinguisticRecord::parse(raw).unwrap();
        assert_eq!(record.word_class, None);
        assert_eq!(record.level, None);
        assert_eq!(record.phonetic, None);
        assert!(record.meanings.is_empty());
        assert!(record.is_empty());
    }

    #[test]
    fn test_unparsable_response() {
        assert!(matches!(
            LinguisticRecord::parse("I don't know"),
            Err(VocabError::OracleParse(_))
        ));
        assert!(matches!(
            LinguisticRecord::parse("{not json}"),
            Err(VocabError::OracleParse(_))
        ));
    }

    #[test]
    fn test_parse_fill_field() {
        let forms = parse_fill_field(r#"{"words":"cooker, cooking"}"#, FillField::RelatedForms);
        assert_eq!(forms.unwrap(), "cooker, cooking");

        let synonyms = parse_fill_field(r#"{"synonyms":["fast","quick"]}"#, FillField::Synonyms);
        assert_eq!(synonyms.unwrap(), "fast, quick");

        assert!(parse_fill_field(r#"{"other":"x"}"#, FillField::Synonyms).is_err());
    }
}
