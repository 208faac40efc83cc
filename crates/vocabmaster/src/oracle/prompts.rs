//! Prompt templates for oracle requests.

use super::provider::FillField;

/// System prompt shared by all requests.
pub fn system_prompt() -> &'static str {
    "You are a concise English vocabulary assistant for language learners. \
     When asked for JSON, reply with a single JSON object and nothing else."
}

/// Structured lookup of a word or phrase.
pub fn lookup_prompt(text: &str, language: &str) -> String {
    format!(
        r#"Analyze the English word or phrase "{text}". Return ONLY valid JSON (no markdown):
{{
  "word_class": "noun | verb | adjective | adverb | phrasal verb | idiom | phrase | preposition | conjunction | interjection",
  "level": "A1 | A2 | B1 | B2 | C1 | C2",
  "phonetic": "/ipa transcription/",
  "gloss_en": "brief main definition in English",
  "meanings": [
    {{"translation": "{language} translation 1", "gloss_en": "definition 1", "example": "example sentence 1"}},
    {{"translation": "{language} translation 2", "gloss_en": "definition 2", "example": "example sentence 2"}}
  ],
  "related_forms": "word1, word2, word3",
  "synonyms": "synonym1, synonym2, synonym3"
}}"#
    )
}

/// One-line translation for a popup.
pub fn translate_prompt(text: &str, language: &str) -> String {
    format!(r#"Translate "{text}" to {language}. Only translation."#)
}

/// Song explanation.
pub fn explain_song_prompt(title: &str, text: &str, language: &str) -> String {
    format!(
        "Explain this song in {language}:\n\"{title}\"\n{text}\nInclude meaning, metaphors, slang."
    )
}

/// Fill one list field of a word.
pub fn fill_field_prompt(word: &str, field: FillField) -> String {
    match field {
        FillField::RelatedForms => format!(
            r#"List 5-10 words with the same root as "{word}". Example: cook -> cooker, cooking, cooked, cookbook. Return JSON: {{"words":"word1, word2, word3"}}"#
        ),
        FillField::Synonyms => format!(
            r#"List 5-8 synonyms for "{word}". Return JSON: {{"synonyms":"syn1, syn2, syn3"}}"#
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_prompt_mentions_word_and_language() {
        let prompt = lookup_prompt("give up", "Russian");
        assert!(prompt.contains("\"give up\""));
        assert!(prompt.contains("Russian translation 1"));
        assert!(prompt.contains("\"meanings\""));
    }

    #[test]
    fn test_fill_field_prompts() {
        assert!(fill_field_prompt("cook", FillField::RelatedForms).contains(r#"{"words""#));
        assert!(fill_field_prompt("fast", FillField::Synonyms).contains(r#"{"synonyms""#));
    }
}
