//! In-memory library of collections, sections, words, and songs.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, VocabError};
use crate::mastery;
use crate::model::{
    describe_location, headword_key, Collection, CollectionId, FolderId, MasteryStatus, Section,
    SectionId, SectionLocation, Song, SongFolder, SongId, Word, WordDraft, WordId,
};

use super::{CatalogStore, Deletion, Scope, WordFilter, WordPatch, WordStore};

/// Current version of the library file format.
pub const LIBRARY_FORMAT_VERSION: &str = "1.0.0";

/// The learner's whole vocabulary and song collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Library {
    /// Version of the library file format.
    pub format_version: String,

    /// When the library was created.
    pub created_at: DateTime<Utc>,

    /// When the library was last modified.
    pub updated_at: DateTime<Utc>,

    next_id: u64,
    collections: Vec<Collection>,
    sections: Vec<Section>,
    words: Vec<Word>,
    #[serde(default)]
    song_folders: Vec<SongFolder>,
    #[serde(default)]
    songs: Vec<Song>,
}

impl Library {
    /// A library seeded with one collection, one section, and one song folder.
    pub fn new() -> Self {
        let mut library = Self::empty();
        let collection = library.allocate_id();
        library.collections.push(Collection {
            id: collection,
            name: "English".to_string(),
            icon: "📚".to_string(),
        });
        let section = library.allocate_id();
        library.sections.push(Section {
            id: section,
            collection_id: collection,
            name: "Topic 1".to_string(),
            icon: "📖".to_string(),
        });
        let folder = library.allocate_id();
        library.song_folders.push(SongFolder {
            id: folder,
            name: "My Songs".to_string(),
        });
        library
    }

    /// A library with nothing in it.
    pub fn empty() -> Self {
        let now = Utc::now();
        Self {
            format_version: LIBRARY_FORMAT_VERSION.to_string(),
            created_at: now,
            updated_at: now,
            next_id: 1,
            collections: Vec::new(),
            sections: Vec::new(),
            words: Vec::new(),
            song_folders: Vec::new(),
            songs: Vec::new(),
        }
    }

    /// All words in creation order.
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// First section in creation order, used as the default destination.
    pub fn default_section(&self) -> Option<SectionId> {
        self.sections.first().map(|s| s.id)
    }

    /// Sorted set of every tag in use.
    pub fn all_tags(&self) -> BTreeSet<String> {
        self.words
            .iter()
            .flat_map(|w| w.tags.iter().cloned())
            .collect()
    }

    /// Number of words per mastery status.
    pub fn status_counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for word in &self.words {
            match word.status {
                MasteryStatus::New => counts.new += 1,
                MasteryStatus::Learning => counts.learning += 1,
                MasteryStatus::Learned => counts.learned += 1,
            }
        }
        counts
    }

    /// Reset every status to the one its passed modes imply. Returns how
    /// many words changed.
    pub(super) fn rederive_statuses(&mut self) -> usize {
        let mut changed = 0;
        for word in &mut self.words {
            let status = mastery::status_for(&word.passed_modes);
            if word.status != status {
                word.status = status;
                changed += 1;
            }
        }
        changed
    }

    /// Words can come back only into existing sections, under free ids and
    /// headwords.
    fn check_restorable(&self, words: &[Word], sections: &[SectionId]) -> Result<()> {
        let mut keys = BTreeSet::new();
        for word in words {
            if self.words.iter().any(|w| w.id == word.id) {
                return Err(VocabError::InvalidState(format!("word {} already exists", word.id)));
            }
            if !sections.contains(&word.section_id) {
                self.section_index(word.section_id)?;
            }
            self.check_unique(&word.headword, None)?;
            if !keys.insert(word.key()) {
                return Err(VocabError::InvalidInput(format!(
                    "\"{}\" appears twice in the restore",
                    word.headword
                )));
            }
        }
        Ok(())
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    fn word_index(&self, id: WordId) -> Result<usize> {
        self.words
            .iter()
            .position(|w| w.id == id)
            .ok_or(VocabError::NotFound { kind: "word", id })
    }

    fn section_index(&self, id: SectionId) -> Result<usize> {
        self.sections
            .iter()
            .position(|s| s.id == id)
            .ok_or(VocabError::NotFound { kind: "section", id })
    }

    fn collection_index(&self, id: CollectionId) -> Result<usize> {
        self.collections
            .iter()
            .position(|c| c.id == id)
            .ok_or(VocabError::NotFound {
                kind: "collection",
                id,
            })
    }

    fn folder_index(&self, id: FolderId) -> Result<usize> {
        self.song_folders
            .iter()
            .position(|f| f.id == id)
            .ok_or(VocabError::NotFound { kind: "folder", id })
    }

    fn song_index(&self, id: SongId) -> Result<usize> {
        self.songs
            .iter()
            .position(|s| s.id == id)
            .ok_or(VocabError::NotFound { kind: "song", id })
    }

    /// Fail if `headword` collides with a word other than `except`.
    fn check_unique(&self, headword: &str, except: Option<WordId>) -> Result<()> {
        let key = headword_key(headword);
        if key.is_empty() {
            return Err(VocabError::InvalidInput("headword is empty".to_string()));
        }
        match self
            .words
            .iter()
            .find(|w| w.key() == key && Some(w.id) != except)
        {
            Some(existing) => Err(VocabError::Duplicate {
                headword: headword.trim().to_string(),
                location: describe_location(self.section_location(existing.section_id).as_ref()),
            }),
            None => Ok(()),
        }
    }

    fn in_scope(&self, word: &Word, scope: Scope) -> bool {
        match scope {
            Scope::All => true,
            Scope::Section(id) => word.section_id == id,
            Scope::Collection(id) => self
                .sections
                .iter()
                .any(|s| s.id == word.section_id && s.collection_id == id),
        }
    }
}

impl Default for Library {
    fn default() -> Self {
        Self::new()
    }
}

/// Word counts by mastery status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub new: usize,
    pub learning: usize,
    pub learned: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.new + self.learning + self.learned
    }
}

impl WordStore for Library {
    fn create_word(&mut self, draft: WordDraft) -> Result<WordId> {
        self.check_unique(&draft.headword, None)?;
        self.section_index(draft.section_id)?;

        let id = self.allocate_id();
        let word = draft.into_word(id, Utc::now());
        info!(id, headword = %word.headword, section = word.section_id, "created word");
        self.words.push(word);
        self.touch();
        Ok(id)
    }

    fn update_word(&mut self, id: WordId, patch: WordPatch) -> Result<()> {
        let index = self.word_index(id)?;
        if let Some(ref headword) = patch.headword {
            self.check_unique(headword, Some(id))?;
        }
        if let Some(section_id) = patch.section_id {
            self.section_index(section_id)?;
        }

        patch.apply_to(&mut self.words[index]);
        debug!(id, "updated word");
        self.touch();
        Ok(())
    }

    fn delete_word(&mut self, id: WordId) -> Result<Word> {
        let index = self.word_index(id)?;
        let word = self.words.remove(index);
        info!(id, headword = %word.headword, "deleted word");
        self.touch();
        Ok(word)
    }

    fn get_word(&self, id: WordId) -> Option<Word> {
        self.words.iter().find(|w| w.id == id).cloned()
    }

    fn find_by_headword(&self, headword: &str) -> Option<Word> {
        let key = headword_key(headword);
        self.words.iter().find(|w| w.key() == key).cloned()
    }

    fn list_words(&self, filter: &WordFilter) -> Vec<Word> {
        self.words
            .iter()
            .filter(|w| self.in_scope(w, filter.scope))
            .filter(|w| filter.level.is_none_or(|level| w.level == level))
            .filter(|w| filter.status.is_none_or(|status| w.status == status))
            .filter(|w| filter.exclude_passed.is_none_or(|mode| !w.has_passed(mode)))
            .cloned()
            .collect()
    }

    fn section_location(&self, section_id: SectionId) -> Option<SectionLocation> {
        let section = self.sections.iter().find(|s| s.id == section_id)?;
        let collection = self
            .collections
            .iter()
            .find(|c| c.id == section.collection_id)?;
        Some(SectionLocation {
            collection: collection.name.clone(),
            section: section.name.clone(),
        })
    }
}

impl CatalogStore for Library {
    fn create_collection(&mut self, name: &str, icon: &str) -> Result<CollectionId> {
        let name = non_empty(name, "collection name")?;
        let id = self.allocate_id();
        self.collections.push(Collection {
            id,
            name,
            icon: icon.to_string(),
        });
        self.touch();
        Ok(id)
    }

    fn update_collection(&mut self, id: CollectionId, name: &str, icon: &str) -> Result<()> {
        let index = self.collection_index(id)?;
        let name = non_empty(name, "collection name")?;
        let collection = &mut self.collections[index];
        collection.name = name;
        collection.icon = icon.to_string();
        self.touch();
        Ok(())
    }

    fn delete_collection(&mut self, id: CollectionId) -> Result<Deletion> {
        let index = self.collection_index(id)?;
        let collection = self.collections.remove(index);
        let (sections, kept): (Vec<Section>, Vec<Section>) = std::mem::take(&mut self.sections)
            .into_iter()
            .partition(|s| s.collection_id == id);
        self.sections = kept;
        let section_ids: BTreeSet<SectionId> = sections.iter().map(|s| s.id).collect();
        let words = drain_words(&mut self.words, |w| section_ids.contains(&w.section_id));
        info!(
            id,
            sections = sections.len(),
            words = words.len(),
            "deleted collection"
        );
        self.touch();
        Ok(Deletion::Collection {
            collection,
            sections,
            words,
        })
    }

    fn collections(&self) -> Vec<Collection> {
        self.collections.clone()
    }

    fn create_section(
        &mut self,
        collection_id: CollectionId,
        name: &str,
        icon: &str,
    ) -> Result<SectionId> {
        self.collection_index(collection_id)?;
        let name = non_empty(name, "section name")?;
        let id = self.allocate_id();
        self.sections.push(Section {
            id,
            collection_id,
            name,
            icon: icon.to_string(),
        });
        self.touch();
        Ok(id)
    }

    fn update_section(&mut self, id: SectionId, name: &str, icon: &str) -> Result<()> {
        let index = self.section_index(id)?;
        let name = non_empty(name, "section name")?;
        let section = &mut self.sections[index];
        section.name = name;
        section.icon = icon.to_string();
        self.touch();
        Ok(())
    }

    fn delete_section(&mut self, id: SectionId) -> Result<Deletion> {
        let index = self.section_index(id)?;
        let section = self.sections.remove(index);
        let words = drain_words(&mut self.words, |w| w.section_id == id);
        info!(id, words = words.len(), "deleted section");
        self.touch();
        Ok(Deletion::Section { section, words })
    }

    fn sections(&self, collection_id: Option<CollectionId>) -> Vec<Section> {
        self.sections
            .iter()
            .filter(|s| collection_id.is_none_or(|c| s.collection_id == c))
            .cloned()
            .collect()
    }

    fn create_folder(&mut self, name: &str) -> Result<FolderId> {
        let name = non_empty(name, "folder name")?;
        let id = self.allocate_id();
        self.song_folders.push(SongFolder { id, name });
        self.touch();
        Ok(id)
    }

    fn update_folder(&mut self, id: FolderId, name: &str) -> Result<()> {
        let index = self.folder_index(id)?;
        self.song_folders[index].name = non_empty(name, "folder name")?;
        self.touch();
        Ok(())
    }

    fn delete_folder(&mut self, id: FolderId) -> Result<Deletion> {
        let index = self.folder_index(id)?;
        let folder = self.song_folders.remove(index);
        let (songs, kept): (Vec<Song>, Vec<Song>) = std::mem::take(&mut self.songs)
            .into_iter()
            .partition(|s| s.folder_id == id);
        self.songs = kept;
        self.touch();
        Ok(Deletion::Folder { folder, songs })
    }

    fn folders(&self) -> Vec<SongFolder> {
        self.song_folders.clone()
    }

    fn create_song(&mut self, folder_id: FolderId, title: &str, text: &str) -> Result<SongId> {
        self.folder_index(folder_id)?;
        let title = non_empty(title, "song title")?;
        let id = self.allocate_id();
        self.songs.push(Song {
            id,
            folder_id,
            title,
            text: text.to_string(),
        });
        self.touch();
        Ok(id)
    }

    fn update_song(&mut self, id: SongId, title: &str, text: &str) -> Result<()> {
        let index = self.song_index(id)?;
        let title = non_empty(title, "song title")?;
        let song = &mut self.songs[index];
        song.title = title;
        song.text = text.to_string();
        self.touch();
        Ok(())
    }

    fn delete_song(&mut self, id: SongId) -> Result<Song> {
        let index = self.song_index(id)?;
        let song = self.songs.remove(index);
        self.touch();
        Ok(song)
    }

    fn get_song(&self, id: SongId) -> Option<Song> {
        self.songs.iter().find(|s| s.id == id).cloned()
    }

    fn songs(&self, folder_id: Option<FolderId>) -> Vec<Song> {
        self.songs
            .iter()
            .filter(|s| folder_id.is_none_or(|f| s.folder_id == f))
            .cloned()
            .collect()
    }

    fn restore(&mut self, deletion: Deletion) -> Result<()> {
        let name = deletion.name().to_string();
        match deletion {
            Deletion::Word { word } => {
                self.check_restorable(std::slice::from_ref(&word), &[])?;
                self.words.push(word);
            }
            Deletion::Section { section, words } => {
                if self.section_index(section.id).is_ok() {
                    return Err(VocabError::InvalidState(format!(
                        "section {} already exists",
                        section.id
                    )));
                }
                self.collection_index(section.collection_id)?;
                self.check_restorable(&words, &[section.id])?;
                self.sections.push(section);
                self.words.extend(words);
            }
            Deletion::Collection {
                collection,
                sections,
                words,
            } => {
                if self.collection_index(collection.id).is_ok() {
                    return Err(VocabError::InvalidState(format!(
                        "collection {} already exists",
                        collection.id
                    )));
                }
                let section_ids: Vec<SectionId> = sections.iter().map(|s| s.id).collect();
                self.check_restorable(&words, &section_ids)?;
                self.collections.push(collection);
                self.sections.extend(sections);
                self.words.extend(words);
            }
            Deletion::Song { song } => {
                self.folder_index(song.folder_id)?;
                if self.song_index(song.id).is_ok() {
                    return Err(VocabError::InvalidState(format!("song {} already exists", song.id)));
                }
                self.songs.push(song);
            }
            Deletion::Folder { folder, songs } => {
                if self.folder_index(folder.id).is_ok() {
                    return Err(VocabError::InvalidState(format!(
                        "folder {} already exists",
                        folder.id
                    )));
                }
                self.song_folders.push(folder);
                self.songs.extend(songs);
            }
        }

        // Ids grow with creation, so sorting by id restores the original order.
        self.collections.sort_by_key(|c| c.id);
        self.sections.sort_by_key(|s| s.id);
        self.words.sort_by_key(|w| w.id);
        self.song_folders.sort_by_key(|f| f.id);
        self.songs.sort_by_key(|s| s.id);
        info!(name = %name, "restored");
        self.touch();
        Ok(())
    }
}

fn drain_words(words: &mut Vec<Word>, remove: impl Fn(&Word) -> bool) -> Vec<Word> {
    let (removed, kept): (Vec<Word>, Vec<Word>) =
        std::mem::take(words).into_iter().partition(|w| remove(w));
    *words = kept;
    removed
}

fn non_empty(value: &str, what: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(VocabError::InvalidInput(format!("{} is empty", what)));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Level, PracticeMode};

    fn library_with_words(headwords: &[&str]) -> (Library, SectionId) {
        let mut library = Library::new();
        let section = library.default_section().unwrap();
        for hw in headwords {
            library.create_word(WordDraft::new(section, *hw)).unwrap();
        }
        (library, section)
    }

    #[test]
    fn test_new_library_is_seeded() {
        let library = Library::new();
        assert_eq!(library.collections().len(), 1);
        assert_eq!(library.sections(None).len(), 1);
        assert_eq!(library.folders().len(), 1);
        let location = library
            .section_location(library.default_section().unwrap())
            .unwrap();
        assert_eq!(location.to_string(), "English › Topic 1");
    }

    #[test]
    fn test_duplicate_rejected_across_sections() {
        let (mut library, _) = library_with_words(&["run"]);
        let collection = library.collections()[0].id;
        let other = library.create_section(collection, "Verbs", "📝").unwrap();

        let err = library.create_word(WordDraft::new(other, "Run")).unwrap_err();
        match err {
            VocabError::Duplicate { headword, location } => {
                assert_eq!(headword, "Run");
                assert_eq!(location, "English › Topic 1");
            }
            other => panic!("expected duplicate, got {other:?}"),
        }
        assert_eq!(library.word_count(), 1);
    }

    #[test]
    fn test_rename_to_existing_headword_rejected() {
        let (mut library, _) = library_with_words(&["apple", "banana"]);
        let banana = library.find_by_headword("BANANA").unwrap();
        let patch = WordPatch {
            headword: Some("Apple".to_string()),
            ..Default::default()
        };
        assert!(library.update_word(banana.id, patch).unwrap_err().is_duplicate());
        assert_eq!(library.get_word(banana.id).unwrap().headword, "banana");

        // Renaming to its own headword with different case is allowed.
        let patch = WordPatch {
            headword: Some("Banana".to_string()),
            ..Default::default()
        };
        library.update_word(banana.id, patch).unwrap();
        assert_eq!(library.get_word(banana.id).unwrap().headword, "Banana");
    }

    #[test]
    fn test_create_in_missing_section_fails() {
        let mut library = Library::new();
        let err = library.create_word(WordDraft::new(999, "ghost")).unwrap_err();
        assert!(matches!(err, VocabError::NotFound { kind: "section", .. }));
        assert_eq!(library.word_count(), 0);
    }

    #[test]
    fn test_list_words_filters() {
        let (mut library, section) = library_with_words(&["apple", "banana"]);
        library
            .create_word(WordDraft::new(section, "cherry").with_level(Level::C1))
            .unwrap();
        let apple = library.find_by_headword("apple").unwrap();
        library
            .update_word(
                apple.id,
                WordPatch::progress(
                    [PracticeMode::Flashcard].into_iter().collect(),
                ),
            )
            .unwrap();

        let c1 = library.list_words(&WordFilter::new().with_level(Some(Level::C1)));
        assert_eq!(c1.len(), 1);
        assert_eq!(c1[0].headword, "cherry");

        let learning =
            library.list_words(&WordFilter::new().with_status(Some(MasteryStatus::Learning)));
        assert_eq!(learning.len(), 1);

        let cards = library.list_words(&WordFilter::new().excluding_passed(PracticeMode::Flashcard));
        assert_eq!(cards.len(), 2);
        assert!(cards.iter().all(|w| w.headword != "apple"));
    }

    #[test]
    fn test_collection_scope() {
        let (mut library, _) = library_with_words(&["apple"]);
        let other = library.create_collection("Spanish", "🌍").unwrap();
        let section = library.create_section(other, "Food", "🍕").unwrap();
        library.create_word(WordDraft::new(section, "manzana")).unwrap();

        let spanish = library.list_words(&WordFilter::new().with_scope(Scope::Collection(other)));
        assert_eq!(spanish.len(), 1);
        assert_eq!(spanish[0].headword, "manzana");
        assert_eq!(library.list_words(&WordFilter::new()).len(), 2);
    }

    #[test]
    fn test_delete_collection_cascades() {
        let mut library = Library::new();
        let collection = library.create_collection("Temp", "⭐").unwrap();
        let section = library.create_section(collection, "A", "📖").unwrap();
        library.create_word(WordDraft::new(section, "ephemeral")).unwrap();

        library.delete_collection(collection).unwrap();
        assert!(library.find_by_headword("ephemeral").is_none());
        assert!(library.sections(Some(collection)).is_empty());
    }

    #[test]
    fn test_delete_folder_removes_songs() {
        let mut library = Library::new();
        let folder = library.folders()[0].id;
        library.create_song(folder, "Song", "la la").unwrap();
        library.delete_folder(folder).unwrap();
        assert!(library.songs(None).is_empty());
    }

    #[test]
    fn test_status_counts_and_tags() {
        let (mut library, section) = library_with_words(&["apple"]);
        library
            .create_word(WordDraft::new(section, "tide").with_tag("ocean-song"))
            .unwrap();
        let counts = library.status_counts();
        assert_eq!(counts.new, 2);
        assert_eq!(counts.total(), 2);
        assert_eq!(
            library.all_tags().into_iter().collect::<Vec<_>>(),
            vec!["ocean-song".to_string()]
        );
    }
}
