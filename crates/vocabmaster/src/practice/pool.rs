//! Word pool construction shared by the three practice modes.

use serde::{Deserialize, Serialize};

use crate::error::{Result, VocabError};
use crate::model::{Level, MasteryStatus, PracticeMode, Word};
use crate::store::{Scope, WordFilter, WordStore};

/// Minimum pool size for a quiz (target plus three distractors).
pub const QUIZ_MIN_POOL: usize = 4;

/// Scope and filters selected before starting a drill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSpec {
    pub scope: Scope,
    /// `None` means "all levels".
    pub level: Option<Level>,
    /// `None` means "all statuses".
    pub status: Option<MasteryStatus>,
}

impl PoolSpec {
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

    /// Store filter for a mode. Flashcards skip words already passed there.
    pub fn filter_for(&self, mode: PracticeMode) -> WordFilter {
        let filter = WordFilter::new()
            .with_scope(self.scope)
            .with_level(self.level)
            .with_status(self.status);
        match mode {
            PracticeMode::Flashcard => filter.excluding_passed(PracticeMode::Flashcard),
            PracticeMode::Quiz | PracticeMode::Recall => filter,
        }
    }
}

/// Snapshot the live filtered pool for a mode.
pub fn build_pool(store: &dyn WordStore, mode: PracticeMode, spec: &PoolSpec) -> Vec<Word> {
    store.list_words(&spec.filter_for(mode))
}

/// Check that a pool can host a session in `mode`.
pub fn check_pool(mode: PracticeMode, pool: &[Word], quiz_min: usize) -> Result<()> {
    if pool.is_empty() {
        return Err(VocabError::EmptyPool);
    }
    if mode == PracticeMode::Quiz && pool.len() < quiz_min {
        return Err(VocabError::InsufficientPool {
            required: quiz_min,
            available: pool.len(),
        });
    }
    Ok(())
}

/// Snapshot and validate a pool in one step.
pub fn snapshot_pool(
    store: &dyn WordStore,
    mode: PracticeMode,
    spec: &PoolSpec,
    quiz_min: usize,
) -> Result<Vec<Word>> {
    let pool = build_pool(store, mode, spec);
    check_pool(mode, &pool, quiz_min)?;
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WordDraft;
    use crate::store::{Library, WordPatch};

    #[test]
    fn test_flashcard_pool_excludes_passed() {
        let mut library = Library::new();
        let section = library.default_section().unwrap();
        let id = library.create_word(WordDraft::new(section, "apple")).unwrap();
        library.create_word(WordDraft::new(section, "pear")).unwrap();
        library
            .update_word(
                id,
                WordPatch::progress(
                    [PracticeMode::Flashcard].into_iter().collect(),
                ),
            )
            .unwrap();

        let spec = PoolSpec::new();
        let cards = build_pool(&library, PracticeMode::Flashcard, &spec);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].headword, "pear");
        assert_eq!(build_pool(&library, PracticeMode::Quiz, &spec).len(), 2);
    }

    #[test]
    fn test_check_pool_conditions() {
        assert!(matches!(
            check_pool(PracticeMode::Recall, &[], QUIZ_MIN_POOL),
            Err(VocabError::EmptyPool)
        ));

        let mut library = Library::new();
        let section = library.default_section().unwrap();
        for hw in ["a1", "a2", "a3"] {
            library.create_word(WordDraft::new(section, hw)).unwrap();
        }
        let pool = build_pool(&library, PracticeMode::Quiz, &PoolSpec::new());
        assert!(matches!(
            check_pool(PracticeMode::Quiz, &pool, QUIZ_MIN_POOL),
            Err(VocabError::InsufficientPool {
                required: 4,
                available: 3
            })
        ));
        assert!(check_pool(PracticeMode::Recall, &pool, QUIZ_MIN_POOL).is_ok());
    }
}
