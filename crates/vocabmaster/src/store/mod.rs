//! Word store contract and the JSON-backed library that implements it.
//!
//! The practice and annotation engines only talk to storage through the
//! [`WordStore`] and [`CatalogStore`] traits. [`Library`] is the in-memory
//! implementation used by the CLI; it persists to a single JSON document.
//!
//! Every mutation either succeeds completely or leaves the store unchanged.

mod import;
mod library;
mod persistence;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::mastery;
use crate::model::{
    Collection, CollectionId, FolderId, Level, MasteryStatus, PracticeMode, Section, SectionId,
    SectionLocation, Song, SongFolder, SongId, Word, WordClass, WordDraft, WordId,
};

pub use import::{import_drafts, parse_import, ImportReport};
pub use library::{Library, StatusCounts, LIBRARY_FORMAT_VERSION};
pub use persistence::{history_directory, HISTORY_LIMIT};

/// Which part of the vocabulary a listing covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Scope {
    #[default]
    All,
    Collection(CollectionId),
    Section(SectionId),
}

/// Filter for [`WordStore::list_words`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordFilter {
    pub scope: Scope,
    /// `None` means every level.
    pub level: Option<Level>,
    /// `None` means every status.
    pub status: Option<MasteryStatus>,
    /// Drop words that already passed this mode.
    pub exclude_passed: Option<PracticeMode>,
}

impl WordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_level(mut self, level: Option<Level>) -> Self {
        self.level = level;
        self
    }

    pub fn with_status(mut self, status: Option<MasteryStatus>) -> Self {
        self.status = status;
        self
    }

    pub fn excluding_passed(mut self, mode: PracticeMode) -> Self {
        self.exclude_passed = Some(mode);
        self
    }
}

/// Partial update of a word; `None` fields are left as they are.
///
/// There is no status field: status always follows from `passed_modes`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WordPatch {
    pub section_id: Option<SectionId>,
    pub headword: Option<String>,
    pub word_class: Option<WordClass>,
    pub level: Option<Level>,
    pub phonetic: Option<String>,
    pub gloss_en: Option<String>,
    pub translation: Option<String>,
    pub example: Option<String>,
    pub my_example: Option<String>,
    pub related_forms: Option<String>,
    pub synonyms: Option<String>,
    pub tags: Option<BTreeSet<String>>,
    pub passed_modes: Option<BTreeSet<PracticeMode>>,
}

impl WordPatch {
    /// Patch that records a practice outcome.
    pub fn progress(passed_modes: BTreeSet<PracticeMode>) -> Self {
        Self {
            passed_modes: Some(passed_modes),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the present fields to a word.
    pub fn apply_to(self, word: &mut Word) {
        if let Some(v) = self.section_id {
            word.section_id = v;
        }
        if let Some(v) = self.headword {
            word.headword = v.trim().to_string();
        }
        if let Some(v) = self.word_class {
            word.word_class = v;
        }
        if let Some(v) = self.level {
            word.level = v;
        }
        if let Some(v) = self.phonetic {
            word.phonetic = v;
        }
        if let Some(v) = self.gloss_en {
            word.gloss_en = v;
        }
        if let Some(v) = self.translation {
            word.translation = v;
        }
        if let Some(v) = self.example {
            word.example = v;
        }
        if let Some(v) = self.my_example {
            word.my_example = v;
        }
        if let Some(v) = self.related_forms {
            word.related_forms = v;
        }
        if let Some(v) = self.synonyms {
            word.synonyms = v;
        }
        if let Some(v) = self.tags {
            word.tags = v;
        }
        if let Some(v) = self.passed_modes {
            word.status = mastery::status_for(&v);
            word.passed_modes = v;
        }
    }
}

/// What a cascading delete removed, enough to put it back with
/// [`CatalogStore::restore`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Deletion {
    Word {
        word: Word,
    },
    Section {
        section: Section,
        words: Vec<Word>,
    },
    Collection {
        collection: Collection,
        sections: Vec<Section>,
        words: Vec<Word>,
    },
    Song {
        song: Song,
    },
    Folder {
        folder: SongFolder,
        songs: Vec<Song>,
    },
}

impl Deletion {
    /// Display name of the deleted entity.
    pub fn name(&self) -> &str {
        match self {
            Deletion::Word { word } => &word.headword,
            Deletion::Section { section, .. } => &section.name,
            Deletion::Collection { collection, .. } => &collection.name,
            Deletion::Song { song } => &song.title,
            Deletion::Folder { folder, .. } => &folder.name,
        }
    }

    /// Words that went with it.
    pub fn words(&self) -> &[Word] {
        match self {
            Deletion::Word { word } => std::slice::from_ref(word),
            Deletion::Section { words, .. } | Deletion::Collection { words, .. } => words,
            Deletion::Song { .. } | Deletion::Folder { .. } => &[],
        }
    }
}

impl From<Word> for Deletion {
    fn from(word: Word) -> Self {
        Deletion::Word { word }
    }
}

impl From<Song> for Deletion {
    fn from(song: Song) -> Self {
        Deletion::Song { song }
    }
}

/// Word persistence as seen by the practice and annotation engines.
pub trait WordStore {
    /// Create a word. Fails with `Duplicate` if the headword already
    /// exists anywhere in the vocabulary (case-insensitive).
    fn create_word(&mut self, draft: WordDraft) -> Result<WordId>;

    /// Apply a partial update.
    fn update_word(&mut self, id: WordId, patch: WordPatch) -> Result<()>;

    /// Delete a word, returning it.
    fn delete_word(&mut self, id: WordId) -> Result<Word>;

    fn get_word(&self, id: WordId) -> Option<Word>;

    /// Find a word by headword, case-insensitively.
    fn find_by_headword(&self, headword: &str) -> Option<Word>;

    /// Snapshot of the words matching a filter, in creation order.
    fn list_words(&self, filter: &WordFilter) -> Vec<Word>;

    /// Collection and section names for a section.
    fn section_location(&self, section_id: SectionId) -> Option<SectionLocation>;
}

/// CRUD for the catalog entities around words.
pub trait CatalogStore {
    fn create_collection(&mut self, name: &str, icon: &str) -> Result<CollectionId>;
    fn update_collection(&mut self, id: CollectionId, name: &str, icon: &str) -> Result<()>;
    /// Delete a collection with its sections and their words.
    fn delete_collection(&mut self, id: CollectionId) -> Result<Deletion>;
    fn collections(&self) -> Vec<Collection>;

    fn create_section(&mut self, collection_id: CollectionId, name: &str, icon: &str)
        -> Result<SectionId>;
    fn update_section(&mut self, id: SectionId, name: &str, icon: &str) -> Result<()>;
    /// Delete a section with its words.
    fn delete_section(&mut self, id: SectionId) -> Result<Deletion>;
    /// Sections of one collection, or all sections, in creation order.
    fn sections(&self, collection_id: Option<CollectionId>) -> Vec<Section>;

    fn create_folder(&mut self, name: &str) -> Result<FolderId>;
    fn update_folder(&mut self, id: FolderId, name: &str) -> Result<()>;
    /// Delete a folder with its songs.
    fn delete_folder(&mut self, id: FolderId) -> Result<Deletion>;
    fn folders(&self) -> Vec<SongFolder>;

    fn create_song(&mut self, folder_id: FolderId, title: &str, text: &str) -> Result<SongId>;
    fn update_song(&mut self, id: SongId, title: &str, text: &str) -> Result<()>;
    fn delete_song(&mut self, id: SongId) -> Result<Song>;
    fn get_song(&self, id: SongId) -> Option<Song>;
    fn songs(&self, folder_id: Option<FolderId>) -> Vec<Song>;

    /// Undo a delete. Fails without changing anything if a parent is gone
    /// or a restored headword has been taken since.
    fn restore(&mut self, deletion: Deletion) -> Result<()>;
}
