//! Tunables shared by the practice and annotation engines.

use crate::model::{Level, WordClass};

/// Configuration for a [`VocabMaster`](crate::VocabMaster) instance.
#[derive(Debug, Clone)]
pub struct VocabConfig {
    /// Level given to words created without an oracle lookup.
    pub default_level: Level,
    /// Word class given to words created without an oracle lookup.
    pub default_word_class: WordClass,
    /// Number of options shown per quiz card (target included).
    pub quiz_option_count: usize,
    /// Shortest normalized selection that opens a popup.
    pub min_selection_len: usize,
    /// Both tokens must be at least this long for prefix matching.
    pub fuzzy_min_len: usize,
    /// Shortest phrase fragment recorded in the root-fragment index.
    pub root_fragment_min_len: usize,
}

impl Default for VocabConfig {
    fn default() -> Self {
        Self {
            default_level: Level::B1,
            default_word_class: WordClass::Phrase,
            quiz_option_count: 4,
            min_selection_len: 2,
            fuzzy_min_len: 4,
            root_fragment_min_len: 6,
        }
    }
}
