//! Annotation session: popup, pending selection list, and commit.
//!
//! The session is sans-IO. [`AnnotationSession::select`] returns a
//! [`LookupRequest`] when the oracle must be asked; the caller performs the
//! call however it likes and hands the answer back through
//! [`AnnotationSession::complete_lookup`]. Answers for a text that is no
//! longer on the popup only fill the cache.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::VocabConfig;
use crate::error::{Result, VocabError};
use crate::model::{describe_location, SectionId, Song, WordDraft, WordId};
use crate::oracle::TranslationOracle;
use crate::store::WordStore;

use super::cache::TranslationCache;
use super::index::{vocabulary_fingerprint, VocabularyIndex};
use super::matcher::{normalize_selection, song_tag};
use super::scan::{scan, PendingTerms, Span};

/// Translation shown on the popup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "text", rename_all = "snake_case")]
pub enum Translation {
    /// Waiting for the oracle.
    Pending,
    Ready(String),
    Failed(String),
}

/// What the popup offers to do with its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PopupAction {
    Add,
    Remove,
    /// Already in the vocabulary; nothing to add.
    Owned,
}

/// Popup for the current selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Popup {
    /// Normalized selection.
    pub text: String,
    /// Selection as the user made it.
    pub original: String,
    pub translation: Translation,
    pub action: PopupAction,
    /// Where the owned entry lives, for [`PopupAction::Owned`].
    pub location: Option<String>,
}

/// An oracle call the caller should perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRequest {
    pub text: String,
}

/// A candidate waiting to be committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingSelection {
    pub text: String,
    /// Destination section; commit skips the entry while this is `None`.
    pub section_id: Option<SectionId>,
    /// Marked for bulk operations.
    pub checked: bool,
}

/// A candidate that turned out to be in the vocabulary already.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateEntry {
    pub headword: String,
    pub location: String,
}

/// Outcome of committing the pending list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitReport {
    pub created: Vec<WordId>,
    /// Dropped from the pending list.
    pub duplicates: Vec<DuplicateEntry>,
    /// Still pending: no section assigned.
    pub unassigned: Vec<String>,
    /// Still pending: the store refused the write.
    pub failed: Vec<(String, String)>,
}

impl CommitReport {
    /// Nothing could be committed because no candidate had a section.
    pub fn needs_sections(&self) -> bool {
        self.created.is_empty() && self.duplicates.is_empty() && !self.unassigned.is_empty()
    }
}

/// Annotation state for one song.
#[derive(Debug, Clone)]
pub struct AnnotationSession {
    title: String,
    text: String,
    config: VocabConfig,
    index: VocabularyIndex,
    pending: IndexMap<String, PendingSelection>,
    in_flight: HashSet<String>,
    popup: Option<Popup>,
    cache: TranslationCache,
    explanation: Option<String>,
    default_section: Option<SectionId>,
}

impl AnnotationSession {
    /// Open a session over `text` with the store's current vocabulary.
    pub fn new(
        title: impl Into<String>,
        text: impl Into<String>,
        store: &dyn WordStore,
        config: VocabConfig,
    ) -> Self {
        let index = VocabularyIndex::from_store(store, &config);
        Self {
            title: title.into(),
            text: text.into(),
            config,
            index,
            pending: IndexMap::new(),
            in_flight: HashSet::new(),
            popup: None,
            cache: TranslationCache::new(),
            explanation: None,
            default_section: None,
        }
    }

    pub fn for_song(song: &Song, store: &dyn WordStore, config: VocabConfig) -> Self {
        Self::new(song.title.clone(), song.text.clone(), store, config)
    }

    /// Section given to new candidates.
    pub fn with_default_section(mut self, section: Option<SectionId>) -> Self {
        self.default_section = section;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn index(&self) -> &VocabularyIndex {
        &self.index
    }

    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    pub fn popup(&self) -> Option<&Popup> {
        self.popup.as_ref()
    }

    /// Tag given to every word committed from this song.
    pub fn song_tag(&self) -> String {
        song_tag(&self.title)
    }

    /// Render plan for the song text.
    pub fn spans(&self) -> Vec<Span> {
        let pending = PendingTerms::new(self.pending.keys());
        scan(&self.text, &self.index, &pending, self.config.fuzzy_min_len)
    }

    /// Rebuild the vocabulary index if the store changed. Returns whether it did.
    pub fn sync_vocabulary(&mut self, store: &dyn WordStore) -> bool {
        if vocabulary_fingerprint(store) == self.index.fingerprint() {
            return false;
        }
        self.index = VocabularyIndex::from_store(store, &self.config);
        true
    }

    // ------------------------------------------------------------------
    // Selection popup
    // ------------------------------------------------------------------

    /// Handle a text selection.
    ///
    /// Opens a popup for the normalized text, or clears it when the
    /// selection is too short. Returns a request when the translation is
    /// neither owned, cached, nor already being fetched.
    pub fn select(&mut self, raw: &str) -> Option<LookupRequest> {
        let text = normalize_selection(raw);
        if text.chars().count() < self.config.min_selection_len {
            self.popup = None;
            return None;
        }

        if let Some(word) = self.index.get(&text) {
            debug!(%text, "selection already in vocabulary");
            self.popup = Some(Popup {
                translation: Translation::Ready(word.translation.clone()),
                action: PopupAction::Owned,
                location: self.index.location_of(&text).map(str::to_string),
                original: raw.trim().to_string(),
                text,
            });
            return None;
        }

        let action = if self.pending.contains_key(&text) {
            PopupAction::Remove
        } else {
            PopupAction::Add
        };
        let cached = self.cache.get(&text).map(str::to_string);
        let request = match cached {
            Some(_) => None,
            None if self.in_flight.contains(&text) => None,
            None => {
                self.in_flight.insert(text.clone());
                Some(LookupRequest { text: text.clone() })
            }
        };
        debug!(%text, cached = cached.is_some(), lookup = request.is_some(), "selection");

        self.popup = Some(Popup {
            translation: cached.map_or(Translation::Pending, Translation::Ready),
            action,
            location: None,
            original: raw.trim().to_string(),
            text,
        });
        request
    }

    /// Deliver an oracle answer. Returns whether the popup was updated.
    pub fn complete_lookup(&mut self, text: &str, result: Result<String>) -> bool {
        self.in_flight.remove(text);
        let translation = match result {
            Ok(translation) => {
                self.cache.insert(text, translation.clone());
                Translation::Ready(translation)
            }
            Err(e) => {
                warn!(%text, error = %e, "translation lookup failed");
                Translation::Failed(e.to_string())
            }
        };

        match self.popup.as_mut() {
            Some(popup) if popup.text == text => {
                popup.translation = translation;
                true
            }
            _ => {
                debug!(%text, "discarding answer for a stale popup");
                false
            }
        }
    }

    /// Give up on a request from [`select`](Self::select) without an answer.
    ///
    /// The text leaves the in-flight set so a later selection asks again,
    /// and a popup still waiting on it shows the failure. Returns whether
    /// the text was in flight.
    pub fn cancel_lookup(&mut self, text: &str, reason: &str) -> bool {
        if !self.in_flight.remove(text) {
            return false;
        }
        debug!(%text, reason, "lookup abandoned");
        if let Some(popup) = self.popup.as_mut() {
            if popup.text == text && popup.translation == Translation::Pending {
                popup.translation = Translation::Failed(reason.to_string());
            }
        }
        true
    }

    /// Texts with an outstanding lookup request.
    pub fn in_flight(&self) -> impl Iterator<Item = &str> {
        self.in_flight.iter().map(String::as_str)
    }

    /// [`select`](Self::select) and answer any lookup right away.
    pub fn select_with(&mut self, raw: &str, oracle: &dyn TranslationOracle) -> Option<&Popup> {
        if let Some(request) = self.select(raw) {
            let result = oracle.translate(&request.text);
            self.complete_lookup(&request.text, result);
        }
        self.popup.as_ref()
    }

    pub fn dismiss_popup(&mut self) {
        self.popup = None;
    }

    // ------------------------------------------------------------------
    // Pending selection list
    // ------------------------------------------------------------------

    /// Add a candidate to the pending list.
    pub fn add(&mut self, text: &str) -> Result<()> {
        let text = normalize_selection(text);
        if text.chars().count() < self.config.min_selection_len {
            return Err(VocabError::InvalidInput(format!(
                "selection \"{}\" is too short",
                text
            )));
        }
        if self.index.contains(&text) {
            return Err(VocabError::Duplicate {
                location: self.index.location_of(&text).unwrap_or("vocabulary").to_string(),
                headword: text,
            });
        }
        if self.pending.contains_key(&text) {
            return Err(VocabError::AlreadySelected(text));
        }

        debug!(%text, "added to selection list");
        if self.popup.as_ref().is_some_and(|p| p.text == text) {
            self.popup = None;
        }
        self.pending.insert(
            text.clone(),
            PendingSelection {
                text,
                section_id: self.default_section,
                checked: false,
            },
        );
        Ok(())
    }

    /// Add whatever the popup shows.
    pub fn add_popup(&mut self) -> Result<()> {
        let text = self
            .popup
            .as_ref()
            .map(|p| p.text.clone())
            .ok_or_else(|| VocabError::InvalidState("no selection".to_string()))?;
        self.add(&text)
    }

    /// Drop a candidate.
    pub fn remove(&mut self, text: &str) -> Option<PendingSelection> {
        let removed = self.pending.shift_remove(text)?;
        if let Some(popup) = self.popup.as_mut().filter(|p| p.text == text) {
            popup.action = PopupAction::Add;
        }
        Some(removed)
    }

    pub fn pending(&self) -> impl Iterator<Item = &PendingSelection> {
        self.pending.values()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, text: &str) -> bool {
        self.pending.contains_key(text)
    }

    /// Whether leaving now would lose candidates.
    pub fn has_unsaved(&self) -> bool {
        !self.pending.is_empty()
    }

    fn entry_mut(&mut self, text: &str) -> Result<&mut PendingSelection> {
        self.pending.get_mut(text).ok_or_else(|| {
            VocabError::InvalidInput(format!("\"{}\" is not in the selection list", text))
        })
    }

    /// Flip one checkbox. Returns the new state.
    pub fn toggle_check(&mut self, text: &str) -> Result<bool> {
        let entry = self.entry_mut(text)?;
        entry.checked = !entry.checked;
        Ok(entry.checked)
    }

    /// Check everything, or uncheck everything if all are checked already.
    pub fn toggle_check_all(&mut self) {
        let all = self.pending.values().all(|p| p.checked);
        for entry in self.pending.values_mut() {
            entry.checked = !all;
        }
    }

    pub fn set_section(&mut self, text: &str, section: SectionId) -> Result<()> {
        self.entry_mut(text)?.section_id = Some(section);
        Ok(())
    }

    /// Assign a section to every checked candidate. Returns how many changed.
    pub fn assign_checked(&mut self, section: SectionId) -> usize {
        let mut count = 0;
        for entry in self.pending.values_mut().filter(|p| p.checked) {
            entry.section_id = Some(section);
            count += 1;
        }
        count
    }

    /// Drop every checked candidate.
    pub fn remove_checked(&mut self) -> Vec<String> {
        let checked: Vec<String> = self
            .pending
            .values()
            .filter(|p| p.checked)
            .map(|p| p.text.clone())
            .collect();
        for text in &checked {
            self.remove(text);
        }
        checked
    }

    /// Create a word for every candidate with a section.
    ///
    /// Each candidate succeeds or fails on its own. Candidates without a
    /// section stay pending, as do those the store refused. Candidates that
    /// became duplicates are dropped and reported.
    pub fn commit(&mut self, store: &mut dyn WordStore) -> CommitReport {
        let tag = self.song_tag();
        let mut report = CommitReport::default();

        for entry in self.pending.values().cloned().collect::<Vec<_>>() {
            let Some(section) = entry.section_id else {
                report.unassigned.push(entry.text);
                continue;
            };

            if let Some(existing) = store.find_by_headword(&entry.text) {
                let location = store.section_location(existing.section_id);
                report.duplicates.push(DuplicateEntry {
                    location: describe_location(location.as_ref()),
                    headword: entry.text.clone(),
                });
                self.pending.shift_remove(&entry.text);
                continue;
            }

            let draft = WordDraft::new(section, entry.text.clone())
                .with_class(self.config.default_word_class)
                .with_level(self.config.default_level)
                .with_tag(tag.clone());
            match store.create_word(draft) {
                Ok(id) => {
                    report.created.push(id);
                    self.pending.shift_remove(&entry.text);
                }
                Err(VocabError::Duplicate { headword, location }) => {
                    report.duplicates.push(DuplicateEntry { headword, location });
                    self.pending.shift_remove(&entry.text);
                }
                Err(e) => {
                    warn!(text = %entry.text, error = %e, "could not commit candidate");
                    report.failed.push((entry.text, e.to_string()));
                }
            }
        }

        info!(
            created = report.created.len(),
            duplicates = report.duplicates.len(),
            unassigned = report.unassigned.len(),
            failed = report.failed.len(),
            song = %self.title,
            "committed selection list"
        );
        self.sync_vocabulary(store);
        report
    }

    // ------------------------------------------------------------------
    // Song explanation
    // ------------------------------------------------------------------

    /// Explanation of the whole song, fetched once per session.
    pub fn explain(&mut self, oracle: &dyn TranslationOracle) -> Result<&str> {
        if self.explanation.is_none() {
            let explanation = oracle.explain_song(&self.title, &self.text).inspect_err(|e| {
                warn!(song = %self.title, error = %e, "song explanation failed");
            })?;
            self.explanation = Some(explanation);
        }
        Ok(self.explanation.as_deref().unwrap_or_default())
    }

    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }
}
