//! Filling word drafts and stored words from the translation oracle.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Result, VocabError};
use crate::model::{describe_location, headword_key, WordDraft, WordId};
use crate::oracle::{FillField, LinguisticRecord, Meaning, TranslationOracle};
use crate::store::{WordFilter, WordPatch, WordStore};

/// How a lookup was triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupMode {
    /// Implicit (e.g. focusing the translation field): only fills blanks.
    Auto,
    /// Explicitly requested: the first meaning replaces translation and example.
    Manual,
}

/// Reject a headword that already exists on another word.
///
/// `editing` is the id of the word being edited, which may keep its own name.
pub fn ensure_available(store: &dyn WordStore, headword: &str, editing: Option<WordId>) -> Result<()> {
    match store.find_by_headword(headword) {
        Some(existing) if Some(existing.id) != editing => {
            let location = store.section_location(existing.section_id);
            Err(VocabError::Duplicate {
                headword: headword.trim().to_string(),
                location: describe_location(location.as_ref()),
            })
        }
        _ => Ok(()),
    }
}

/// Merge an oracle record into a draft.
pub fn merge_record(draft: &mut WordDraft, record: &LinguisticRecord, mode: LookupMode) {
    if let Some(class) = record.word_class {
        draft.word_class = class;
    }
    if let Some(level) = record.level {
        draft.level = level;
    }
    override_with(&mut draft.phonetic, record.phonetic.as_deref());
    override_with(&mut draft.gloss_en, record.gloss_en.as_deref());
    override_with(&mut draft.related_forms, record.related_forms.as_deref());
    override_with(&mut draft.synonyms, record.synonyms.as_deref());

    let translation = record.primary_translation();
    let example = record.primary_example();
    match mode {
        LookupMode::Auto => {
            fill_blank(&mut draft.translation, translation);
            fill_blank(&mut draft.example, example);
        }
        LookupMode::Manual => {
            override_with(&mut draft.translation, translation);
            override_with(&mut draft.example, example);
        }
    }
}

fn override_with(field: &mut String, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
        *field = value.to_string();
    }
}

fn fill_blank(field: &mut String, value: Option<&str>) {
    if field.trim().is_empty() {
        override_with(field, value);
    }
}

/// Translations offered by a lookup that the learner may add to a draft.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranslationChoices {
    pub meanings: Vec<Meaning>,
    /// Lowercased translations already on the draft.
    added: BTreeSet<String>,
}

impl TranslationChoices {
    /// Choices from a record; the first meaning counts as added.
    pub fn from_record(record: &LinguisticRecord) -> Self {
        let added = record
            .meanings
            .first()
            .map(|m| m.translation.to_lowercase())
            .into_iter()
            .collect();
        Self {
            meanings: record.meanings.clone(),
            added,
        }
    }

    pub fn is_added(&self, translation: &str) -> bool {
        self.added.contains(&translation.to_lowercase())
    }

    /// Append a translation (and its example) to the draft.
    ///
    /// Returns `false` if it was already added, comparing case-insensitively.
    pub fn add(&mut self, draft: &mut WordDraft, translation: &str) -> bool {
        if !self.added.insert(translation.to_lowercase()) {
            return false;
        }
        append(&mut draft.translation, translation, ", ");

        let example = self
            .meanings
            .iter()
            .find(|m| m.translation == translation)
            .and_then(|m| m.example.as_deref());
        if let Some(example) = example {
            append(&mut draft.example, example, "\n");
        }
        true
    }
}

fn append(field: &mut String, value: &str, separator: &str) {
    let current = field.trim();
    *field = if current.is_empty() {
        value.to_string()
    } else {
        format!("{}{}{}", current, separator, value)
    };
}

/// Look up a draft's headword and merge the answer.
///
/// A duplicate headword stops before any oracle call. An oracle failure is
/// logged and leaves the draft untouched, returning `Ok(None)`.
pub fn enrich_draft(
    store: &dyn WordStore,
    oracle: &dyn TranslationOracle,
    draft: &mut WordDraft,
    mode: LookupMode,
    editing: Option<WordId>,
) -> Result<Option<TranslationChoices>> {
    let headword = draft.headword.trim().to_string();
    if headword.is_empty() {
        return Err(VocabError::InvalidInput("headword is empty".to_string()));
    }
    ensure_available(store, &headword, editing)?;

    match oracle.lookup(&headword) {
        Ok(record) => {
            debug!(%headword, oracle = oracle.name(), ?mode, "lookup merged");
            merge_record(draft, &record, mode);
            Ok(Some(TranslationChoices::from_record(&record)))
        }
        Err(e) => {
            warn!(%headword, oracle = oracle.name(), error = %e, "lookup failed");
            Ok(None)
        }
    }
}

/// Result of a bulk fill.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillReport {
    pub updated: Vec<WordId>,
    pub failed: Vec<(WordId, String)>,
}

/// Fill `field` on every word in `filter` that has it empty.
pub fn fill_missing(
    store: &mut dyn WordStore,
    oracle: &dyn TranslationOracle,
    field: FillField,
    filter: &WordFilter,
) -> FillReport {
    let mut report = FillReport::default();
    let targets = store.list_words(filter).into_iter().filter(|w| match field {
        FillField::RelatedForms => w.related_forms.trim().is_empty(),
        FillField::Synonyms => w.synonyms.trim().is_empty(),
    });

    for word in targets.collect::<Vec<_>>() {
        let value = match oracle.fill_field(&word.headword, field) {
            Ok(value) => value,
            Err(e) => {
                warn!(word_id = word.id, %field, error = %e, "field fill failed");
                report.failed.push((word.id, e.to_string()));
                continue;
            }
        };
        let patch = match field {
            FillField::RelatedForms => WordPatch {
                related_forms: Some(value),
                ..Default::default()
            },
            FillField::Synonyms => WordPatch {
                synonyms: Some(value),
                ..Default::default()
            },
        };
        patch_or_report(store, word.id, patch, &mut report);
    }

    info!(%field, updated = report.updated.len(), failed = report.failed.len(), "bulk fill done");
    report
}

/// Translate every word in `filter` that has no translation.
pub fn translate_missing(
    store: &mut dyn WordStore,
    oracle: &dyn TranslationOracle,
    filter: &WordFilter,
) -> FillReport {
    let mut report = FillReport::default();
    let targets: Vec<_> = store
        .list_words(filter)
        .into_iter()
        .filter(|w| w.translation.trim().is_empty())
        .collect();

    for word in targets {
        match oracle.translate(&headword_key(&word.headword)) {
            Ok(translation) if !translation.trim().is_empty() => {
                let patch = WordPatch {
                    translation: Some(translation.trim().to_string()),
                    ..Default::default()
                };
                patch_or_report(store, word.id, patch, &mut report);
            }
            Ok(_) => report.failed.push((word.id, "empty translation".to_string())),
            Err(e) => {
                warn!(word_id = word.id, error = %e, "translation failed");
                report.failed.push((word.id, e.to_string()));
            }
        }
    }

    info!(updated = report.updated.len(), failed = report.failed.len(), "bulk translate done");
    report
}

fn patch_or_report(store: &mut dyn WordStore, id: WordId, patch: WordPatch, report: &mut FillReport) {
    match store.update_word(id, patch) {
        Ok(()) => report.updated.push(id),
        Err(e) => report.failed.push((id, e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Level, WordClass};
    use crate::oracle::MockOracle;
    use crate::store::Library;

    fn record() -> LinguisticRecord {
        LinguisticRecord {
            word_class: Some(WordClass::PhrasalVerb),
            level: Some(Level::B2),
            phonetic: Some("/ɡɪv ʌp/".to_string()),
            gloss_en: Some("stop trying".to_string()),
            meanings: vec![
                Meaning {
                    translation: "сдаваться".to_string(),
                    gloss_en: None,
                    example: Some("Never give up.".to_string()),
                },
                Meaning {
                    translation: "бросать".to_string(),
                    gloss_en: None,
                    example: Some("He gave up smoking.".to_string()),
                },
            ],
            ..LinguisticRecord::default()
        }
    }

    #[test]
    fn test_auto_mode_only_fills_blanks() {
        let mut draft = WordDraft::new(1, "give up").with_translation("отказаться");
        merge_record(&mut draft, &record(), LookupMode::Auto);
        assert_eq!(draft.translation, "отказаться");
        assert_eq!(draft.example, "Never give up.");
        assert_eq!(draft.word_class, WordClass::PhrasalVerb);
        assert_eq!(draft.level, Level::B2);
    }

    #[test]
    fn test_manual_mode_overrides() {
        let mut draft = WordDraft::new(1, "give up").with_translation("отказаться");
        merge_record(&mut draft, &record(), LookupMode::Manual);
        assert_eq!(draft.translation, "сдаваться");
    }

    #[test]
    fn test_empty_record_changes_nothing() {
        let mut draft = WordDraft::new(1, "give up").with_gloss("quit");
        let before = draft.clone();
        merge_record(&mut draft, &LinguisticRecord::default(), LookupMode::Manual);
        assert_eq!(draft, before);
    }

    #[test]
    fn test_translation_choices() {
        let mut draft = WordDraft::new(1, "give up");
        merge_record(&mut draft, &record(), LookupMode::Manual);
        let mut choices = TranslationChoices::from_record(&record());

        assert!(choices.is_added("Сдаваться"));
        assert!(!choices.add(&mut draft, "сдаваться"));
        assert!(choices.add(&mut draft, "бросать"));
        assert!(!choices.add(&mut draft, "БРОСАТЬ"));
        assert_eq!(draft.translation, "сдаваться, бросать");
        assert_eq!(draft.example, "Never give up.\nHe gave up smoking.");
    }

    #[test]
    fn test_duplicate_stops_lookup() {
        let mut library = Library::new();
        let section = library.default_section().unwrap();
        let id = library.create_word(WordDraft::new(section, "run")).unwrap();
        let oracle = MockOracle::new();

        let mut draft = WordDraft::new(section, "Run");
        let result = enrich_draft(&library, &oracle, &mut draft, LookupMode::Manual, None);
        assert!(matches!(result, Err(VocabError::Duplicate { .. })));
        assert_eq!(oracle.call_count(), 0);

        // Editing the word itself is fine.
        let result = enrich_draft(&library, &oracle, &mut draft, LookupMode::Manual, Some(id));
        assert!(result.unwrap().is_some());
        assert_eq!(draft.translation, "tr:run");
    }

    #[test]
    fn test_oracle_failure_leaves_draft() {
        let library = Library::new();
        let oracle = MockOracle::new().failing_on("run");
        let mut draft = WordDraft::new(1, "run").with_translation("бежать");
        let before = draft.clone();
        let result = enrich_draft(&library, &oracle, &mut draft, LookupMode::Manual, None);
        assert!(result.unwrap().is_none());
        assert_eq!(draft, before);
    }

    #[test]
    fn test_bulk_fill_patches_successes_only() {
        let mut library = Library::new();
        let section = library.default_section().unwrap();
        let cook = library.create_word(WordDraft::new(section, "cook")).unwrap();
        let bake = library.create_word(WordDraft::new(section, "bake")).unwrap();
        let oracle = MockOracle::new()
            .with_field("cook", FillField::Synonyms, "prepare, make")
            .failing_on("bake");

        let report = fill_missing(&mut library, &oracle, FillField::Synonyms, &WordFilter::new());
        assert_eq!(report.updated, vec![cook]);
        assert_eq!(report.failed[0].0, bake);
        assert_eq!(library.get_word(cook).unwrap().synonyms, "prepare, make");
        assert!(library.get_word(bake).unwrap().synonyms.is_empty());

        let report = translate_missing(&mut library, &oracle, &WordFilter::new());
        assert_eq!(report.updated, vec![cook]);
        assert_eq!(library.get_word(cook).unwrap().translation, "tr:cook");
    }
}
