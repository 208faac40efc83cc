//! State shared by every practice session: the pool snapshot, the cursor,
//! the running score, and status write-back.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, VocabError};
use crate::mastery::{self, MasteryOutcome};
use crate::model::{PracticeMode, Word, WordId};
use crate::store::{WordPatch, WordStore};

use super::pool::{snapshot_pool, PoolSpec};

/// Progress bar snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionProgress {
    pub index: usize,
    pub total: usize,
    pub correct: usize,
    pub wrong: usize,
}

/// Final result of a completed session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub mode: PracticeMode,
    pub correct: usize,
    pub total: usize,
    /// Missed words in the order they were answered.
    pub wrong_words: Vec<Word>,
}

impl SessionSummary {
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 / self.total as f64
    }
}

/// Result of judging one card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Judgment {
    pub word_id: WordId,
    pub correct: bool,
    /// Mastery update as persisted, or `None` if the write-back failed.
    pub outcome: Option<MasteryOutcome>,
    /// Whether this judgment completed the session.
    pub completed: bool,
}

/// Shared state machine behind the flashcard, quiz, and recall sessions.
#[derive(Debug, Clone)]
pub(crate) struct SessionCore {
    mode: PracticeMode,
    spec: PoolSpec,
    quiz_min: usize,
    pool: Vec<Word>,
    index: usize,
    correct: usize,
    wrong_words: Vec<Word>,
    completed: bool,
}

impl SessionCore {
    pub(crate) fn start(
        store: &dyn WordStore,
        mode: PracticeMode,
        spec: PoolSpec,
        quiz_min: usize,
    ) -> Result<Self> {
        let pool = snapshot_pool(store, mode, &spec, quiz_min)?;
        debug!(%mode, size = pool.len(), "session started");
        Ok(Self::from_pool(mode, spec, quiz_min, pool))
    }

    pub(crate) fn from_pool(
        mode: PracticeMode,
        spec: PoolSpec,
        quiz_min: usize,
        pool: Vec<Word>,
    ) -> Self {
        Self {
            mode,
            spec,
            quiz_min,
            pool,
            index: 0,
            correct: 0,
            wrong_words: Vec::new(),
            completed: false,
        }
    }

    pub(crate) fn mode(&self) -> PracticeMode {
        self.mode
    }

    pub(crate) fn pool(&self) -> &[Word] {
        &self.pool
    }

    pub(crate) fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn is_completed(&self) -> bool {
        self.completed
    }

    pub(crate) fn current(&self) -> Option<&Word> {
        if self.completed {
            return None;
        }
        self.pool.get(self.index)
    }

    pub(crate) fn progress(&self) -> SessionProgress {
        SessionProgress {
            index: self.index,
            total: self.pool.len(),
            correct: self.correct,
            wrong: self.wrong_words.len(),
        }
    }

    pub(crate) fn summary(&self) -> Option<SessionSummary> {
        self.completed.then(|| SessionSummary {
            mode: self.mode,
            correct: self.correct,
            total: self.pool.len(),
            wrong_words: self.wrong_words.clone(),
        })
    }

    /// Judge the current card, write the mastery update back, and advance.
    pub(crate) fn judge(&mut self, store: &mut dyn WordStore, correct: bool) -> Result<Judgment> {
        let word = self
            .current()
            .cloned()
            .ok_or_else(|| VocabError::InvalidState("session is completed".to_string()))?;

        let outcome = write_back(store, word.id, self.mode, correct);

        if correct {
            self.correct += 1;
        } else {
            self.wrong_words.push(word.clone());
        }
        self.index += 1;
        if self.index >= self.pool.len() {
            self.completed = true;
            debug!(
                mode = %self.mode,
                correct = self.correct,
                total = self.pool.len(),
                "session completed"
            );
        }

        Ok(Judgment {
            word_id: word.id,
            correct,
            outcome,
            completed: self.completed,
        })
    }

    /// Re-snapshot the live pool and start over. Only valid once completed.
    pub(crate) fn restart(&mut self, store: &dyn WordStore) -> Result<()> {
        if !self.completed {
            return Err(VocabError::InvalidState(
                "only a completed session can be restarted".to_string(),
            ));
        }
        *self = Self::start(store, self.mode, self.spec, self.quiz_min)?;
        Ok(())
    }
}

/// Persist the mastery update for one judgment.
///
/// Reads the live word so the update starts from the latest passed-mode set.
/// Failures are logged and leave the stored value unchanged; the session
/// keeps advancing regardless.
pub(crate) fn write_back(
    store: &mut dyn WordStore,
    word_id: WordId,
    mode: PracticeMode,
    correct: bool,
) -> Option<MasteryOutcome> {
    let Some(word) = store.get_word(word_id) else {
        warn!(word_id, %mode, "word vanished before status write-back");
        return None;
    };

    let outcome = mastery::compute(&word.passed_modes, mode, correct);
    let patch = WordPatch::progress(outcome.passed_modes.clone());
    match store.update_word(word_id, patch) {
        Ok(()) => {
            debug!(word_id, %mode, correct, status = %outcome.status, "status written back");
            Some(outcome)
        }
        Err(e) => {
            warn!(word_id, %mode, error = %e, "status write-back failed");
            None
        }
    }
}
