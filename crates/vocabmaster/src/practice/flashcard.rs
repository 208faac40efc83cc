//! Flashcard drill: reveal the card, then judge "know" or "don't know".

use crate::error::Result;
use crate::model::{PracticeMode, Word};
use crate::store::WordStore;

use super::pool::{PoolSpec, QUIZ_MIN_POOL};
use super::session::{Judgment, SessionCore, SessionProgress, SessionSummary};

/// A flashcard session over a snapshotted pool.
#[derive(Debug, Clone)]
pub struct FlashcardSession {
    core: SessionCore,
    revealed: bool,
}

impl FlashcardSession {
    /// Start a session. Words already passed in flashcard mode are skipped.
    pub fn start(store: &dyn WordStore, spec: PoolSpec) -> Result<Self> {
        let core = SessionCore::start(store, PracticeMode::Flashcard, spec, QUIZ_MIN_POOL)?;
        Ok(Self {
            core,
            revealed: false,
        })
    }

    /// The card being shown, or `None` once completed.
    pub fn current(&self) -> Option<&Word> {
        self.core.current()
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Flip the card. Flipping again hides the back.
    pub fn toggle_reveal(&mut self) {
        if !self.core.is_completed() {
            self.revealed = !self.revealed;
        }
    }

    pub fn reveal(&mut self) {
        if !self.core.is_completed() {
            self.revealed = true;
        }
    }

    /// Judge the current card and advance to the next one face down.
    pub fn judge(&mut self, store: &mut dyn WordStore, know: bool) -> Result<Judgment> {
        let judgment = self.core.judge(store, know)?;
        self.revealed = false;
        Ok(judgment)
    }

    pub fn progress(&self) -> SessionProgress {
        self.core.progress()
    }

    pub fn is_completed(&self) -> bool {
        self.core.is_completed()
    }

    pub fn summary(&self) -> Option<SessionSummary> {
        self.core.summary()
    }

    pub fn pool(&self) -> &[Word] {
        self.core.pool()
    }

    /// Start again from the live pool.
    pub fn restart(&mut self, store: &dyn WordStore) -> Result<()> {
        self.core.restart(store)?;
        self.revealed = false;
        Ok(())
    }
}
