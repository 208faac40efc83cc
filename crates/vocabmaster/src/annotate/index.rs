//! Vocabulary index used by the lyric scan.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::config::VocabConfig;
use crate::model::{describe_location, headword_key, SectionLocation, Word, WordId};
use crate::store::{WordFilter, WordStore};

use super::matcher::{is_match_with, strip_non_letters};

/// Tooltip content for a vocabulary entry matching a span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabMatch {
    pub word_id: WordId,
    pub headword: String,
    pub phonetic: String,
    pub translation: String,
    pub related_forms: String,
    /// "Collection › Section" of the entry.
    pub location: String,
}

/// A multi-word phrase a lone token belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseRef {
    pub word_id: WordId,
    pub phrase: String,
    pub translation: String,
    pub location: String,
}

#[derive(Debug, Clone)]
struct Entry {
    key: String,
    word: Word,
    location: String,
}

impl Entry {
    fn to_match(&self) -> VocabMatch {
        VocabMatch {
            word_id: self.word.id,
            headword: self.word.headword.clone(),
            phonetic: self.word.phonetic.clone(),
            translation: self.word.translation.clone(),
            related_forms: self.word.related_forms.clone(),
            location: self.location.clone(),
        }
    }
}

/// Lookup structures built once per vocabulary snapshot.
#[derive(Debug, Clone, Default)]
pub struct VocabularyIndex {
    entries: Vec<Entry>,
    by_key: HashMap<String, usize>,
    /// Indexes of multi-word entries, longest key first.
    phrases: Vec<usize>,
    fragments: IndexMap<String, Vec<PhraseRef>>,
    fingerprint: String,
    fuzzy_min_len: usize,
}

impl VocabularyIndex {
    /// Index every word in the store.
    pub fn from_store(store: &dyn WordStore, config: &VocabConfig) -> Self {
        let entries = store
            .list_words(&WordFilter::new())
            .into_iter()
            .map(|word| {
                let location = store.section_location(word.section_id);
                (word, location)
            })
            .collect();
        Self::build(entries, config)
    }

    /// Index an explicit word list with resolved locations.
    pub fn build(words: Vec<(Word, Option<SectionLocation>)>, config: &VocabConfig) -> Self {
        let entries: Vec<Entry> = words
            .into_iter()
            .map(|(word, location)| Entry {
                key: headword_key(&word.headword),
                location: describe_location(location.as_ref()),
                word,
            })
            .collect();

        let mut by_key = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            by_key.entry(entry.key.clone()).or_insert(i);
        }

        let mut phrases: Vec<usize> = (0..entries.len())
            .filter(|&i| entries[i].key.contains(' '))
            .collect();
        phrases.sort_by(|&a, &b| {
            let (a, b) = (&entries[a].key, &entries[b].key);
            b.chars().count().cmp(&a.chars().count())
        });

        let mut fragments: IndexMap<String, Vec<PhraseRef>> = IndexMap::new();
        for &i in &phrases {
            let entry = &entries[i];
            for part in entry.key.split_whitespace() {
                let fragment = strip_non_letters(part);
                if fragment.len() < config.root_fragment_min_len {
                    continue;
                }
                let refs = fragments.entry(fragment).or_default();
                if refs.iter().any(|r| r.word_id == entry.word.id) {
                    continue;
                }
                refs.push(PhraseRef {
                    word_id: entry.word.id,
                    phrase: entry.word.headword.clone(),
                    translation: entry.word.translation.clone(),
                    location: entry.location.clone(),
                });
            }
        }

        let fingerprint = fingerprint_entries(&entries);
        debug!(
            words = entries.len(),
            phrases = phrases.len(),
            fragments = fragments.len(),
            "vocabulary index built"
        );

        Self {
            entries,
            by_key,
            phrases,
            fragments,
            fingerprint,
            fuzzy_min_len: config.fuzzy_min_len,
        }
    }

    /// Digest of the indexed content. Equal fingerprints mean equal indexes.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact lookup by lowercase headword.
    pub fn get(&self, key: &str) -> Option<&Word> {
        self.by_key.get(key).map(|&i| &self.entries[i].word)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    /// Location label for an exact headword.
    pub fn location_of(&self, key: &str) -> Option<&str> {
        self.by_key.get(key).map(|&i| self.entries[i].location.as_str())
    }

    /// Multi-word headwords, longest first.
    pub fn phrases(&self) -> impl Iterator<Item = &str> {
        self.phrases.iter().map(|&i| self.entries[i].key.as_str())
    }

    /// Every entry whose headword fuzzily matches `text` (lowercase).
    pub fn matches(&self, text: &str) -> Vec<VocabMatch> {
        self.entries
            .iter()
            .filter(|e| is_match_with(text, &e.key, self.fuzzy_min_len))
            .map(Entry::to_match)
            .collect()
    }

    /// Phrases that `token` (lowercase) is a long fragment of.
    pub fn fragment(&self, token: &str) -> Option<&[PhraseRef]> {
        self.fragments.get(token).map(Vec::as_slice)
    }
}

/// Fingerprint a store's current vocabulary without building an index.
pub fn vocabulary_fingerprint(store: &dyn WordStore) -> String {
    let entries: Vec<Entry> = store
        .list_words(&WordFilter::new())
        .into_iter()
        .map(|word| Entry {
            key: headword_key(&word.headword),
            location: describe_location(store.section_location(word.section_id).as_ref()),
            word,
        })
        .collect();
    fingerprint_entries(&entries)
}

fn fingerprint_entries(entries: &[Entry]) -> String {
    let mut rows: Vec<_> = entries
        .iter()
        .map(|e| {
            (
                e.word.id,
                e.key.as_str(),
                e.word.phonetic.as_str(),
                e.word.translation.as_str(),
                e.word.related_forms.as_str(),
                e.location.as_str(),
            )
        })
        .collect();
    rows.sort_unstable();

    let mut hasher = Sha256::new();
    for (id, key, phonetic, translation, forms, location) in rows {
        hasher.update(id.to_le_bytes());
        for field in [key, phonetic, translation, forms, location] {
            hasher.update(field.as_bytes());
            hasher.update([0u8]);
        }
    }
    format!("sha256:{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WordDraft;
    use crate::store::Library;

    fn index_of(words: &[&str]) -> (Library, VocabularyIndex) {
        let mut library = Library::new();
        let section = library.default_section().unwrap();
        for hw in words {
            library.create_word(WordDraft::new(section, *hw)).unwrap();
        }
        let index = VocabularyIndex::from_store(&library, &VocabConfig::default());
        (library, index)
    }

    #[test]
    fn test_phrases_longest_first() {
        let (_, index) = index_of(&["new york", "york", "new york city", "take off"]);
        let phrases: Vec<_> = index.phrases().collect();
        assert_eq!(phrases, vec!["new york city", "new york", "take off"]);
    }

    #[test]
    fn test_fragments_need_six_letters() {
        let (_, index) = index_of(&["breaking news", "give up"]);
        assert_eq!(index.fragment("breaking").unwrap()[0].phrase, "breaking news");
        assert!(index.fragment("news").is_none());
        assert!(index.fragment("give").is_none());
    }

    #[test]
    fn test_matches_and_exact_lookup() {
        let (_, index) = index_of(&["Teach", "run"]);
        assert!(index.contains("teach"));
        assert_eq!(index.get("teach").unwrap().headword, "Teach");
        assert_eq!(index.matches("teaching").len(), 1);
        assert!(index.matches("running").is_empty());
        assert_eq!(index.location_of("run"), Some("English › Topic 1"));
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let (mut library, index) = index_of(&["apple"]);
        assert_eq!(index.fingerprint(), vocabulary_fingerprint(&library));

        let section = library.default_section().unwrap();
        library.create_word(WordDraft::new(section, "pear")).unwrap();
        assert_ne!(index.fingerprint(), vocabulary_fingerprint(&library));
    }
}
