//! Collections, sections, and songs that organize the vocabulary.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::word::SectionId;

pub type CollectionId = u64;
pub type SongId = u64;
pub type FolderId = u64;

/// A top-level grouping of sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub id: CollectionId,
    pub name: String,
    pub icon: String,
}

/// A named group of words inside a collection, ordered by creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    pub collection_id: CollectionId,
    pub name: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongFolder {
    pub id: FolderId,
    pub name: String,
}

/// Song lyrics pasted by the learner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub id: SongId,
    pub folder_id: FolderId,
    pub title: String,
    pub text: String,
}

/// Where a word lives, for tooltips and duplicate messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionLocation {
    pub collection: String,
    pub section: String,
}

impl fmt::Display for SectionLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} › {}", self.collection, self.section)
    }
}

/// Render an optional location the way duplicate messages show it.
pub fn describe_location(location: Option<&SectionLocation>) -> String {
    location
        .map(|loc| loc.to_string())
        .unwrap_or_else(|| "Unknown section".to_string())
}
