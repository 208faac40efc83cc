//! Data model: words, their classification enums, and the catalog around them.

mod catalog;
mod types;
mod word;

pub use catalog::{
    describe_location, Collection, CollectionId, FolderId, Section, SectionLocation, Song,
    SongFolder, SongId,
};
pub use types::{Level, MasteryStatus, PracticeMode, WordClass};
pub use word::{headword_key, SectionId, Word, WordDraft, WordId};
