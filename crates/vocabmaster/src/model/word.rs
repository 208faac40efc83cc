//! Word entity and the draft used to create one.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::{Level, MasteryStatus, PracticeMode, WordClass};

/// Identifier of a word in the store.
pub type WordId = u64;

/// Identifier of a section in the store.
pub type SectionId = u64;

/// A vocabulary entry being learned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub id: WordId,

    /// Section that owns this word.
    pub section_id: SectionId,

    /// The word or phrase, case preserved.
    pub headword: String,

    pub word_class: WordClass,

    pub level: Level,

    /// IPA transcription.
    #[serde(default)]
    pub phonetic: String,

    /// Primary English definition.
    #[serde(default)]
    pub gloss_en: String,

    /// Primary translated gloss.
    #[serde(default)]
    pub translation: String,

    #[serde(default)]
    pub example: String,

    /// Example written by the learner.
    #[serde(default)]
    pub my_example: String,

    /// Comma-joined morphologically related forms.
    #[serde(default)]
    pub related_forms: String,

    /// Comma-joined synonyms.
    #[serde(default)]
    pub synonyms: String,

    #[serde(default)]
    pub tags: BTreeSet<String>,

    #[serde(default)]
    pub status: MasteryStatus,

    /// Modes in which the word was most recently answered correctly.
    #[serde(default)]
    pub passed_modes: BTreeSet<PracticeMode>,

    pub created_at: DateTime<Utc>,
}

impl Word {
    /// Lowercased, trimmed headword used for uniqueness and matching.
    pub fn key(&self) -> String {
        headword_key(&self.headword)
    }

    /// Whether the headword is a multi-word phrase.
    pub fn is_phrase(&self) -> bool {
        self.key().contains(' ')
    }

    pub fn has_passed(&self, mode: PracticeMode) -> bool {
        self.passed_modes.contains(&mode)
    }

    pub fn related_forms_list(&self) -> Vec<&str> {
        split_list(&self.related_forms)
    }

    pub fn synonyms_list(&self) -> Vec<&str> {
        split_list(&self.synonyms)
    }
}

/// Everything needed to create a word; the store assigns the id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordDraft {
    pub section_id: SectionId,
    pub headword: String,
    pub word_class: WordClass,
    pub level: Level,
    pub phonetic: String,
    pub gloss_en: String,
    pub translation: String,
    pub example: String,
    pub my_example: String,
    pub related_forms: String,
    pub synonyms: String,
    pub tags: BTreeSet<String>,
}

impl WordDraft {
    /// Create a draft with default class and level.
    pub fn new(section_id: SectionId, headword: impl Into<String>) -> Self {
        Self {
            section_id,
            headword: headword.into(),
            ..Default::default()
        }
    }

    pub fn with_class(mut self, word_class: WordClass) -> Self {
        self.word_class = word_class;
        self
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_gloss(mut self, gloss_en: impl Into<String>) -> Self {
        self.gloss_en = gloss_en.into();
        self
    }

    pub fn with_translation(mut self, translation: impl Into<String>) -> Self {
        self.translation = translation.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn key(&self) -> String {
        headword_key(&self.headword)
    }

    /// Turn the draft into a fresh word with empty practice history.
    pub fn into_word(self, id: WordId, created_at: DateTime<Utc>) -> Word {
        Word {
            id,
            section_id: self.section_id,
            headword: self.headword.trim().to_string(),
            word_class: self.word_class,
            level: self.level,
            phonetic: self.phonetic,
            gloss_en: self.gloss_en,
            translation: self.translation,
            example: self.example,
            my_example: self.my_example,
            related_forms: self.related_forms,
            synonyms: self.synonyms,
            tags: self.tags,
            status: MasteryStatus::New,
            passed_modes: BTreeSet::new(),
            created_at,
        }
    }
}

/// Normalize a headword for case-insensitive comparison.
pub fn headword_key(headword: &str) -> String {
    headword.trim().to_lowercase()
}

fn split_list(joined: &str) -> Vec<&str> {
    joined
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}
