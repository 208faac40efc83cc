//! Recall drill: show the translation, type the headword.

use serde::{Deserialize, Serialize};

use crate::error::{Result, VocabError};
use crate::model::{PracticeMode, Word};
use crate::store::WordStore;

use super::pool::{PoolSpec, QUIZ_MIN_POOL};
use super::session::{Judgment, SessionCore, SessionProgress, SessionSummary};

/// Verdict on a typed answer, kept until the learner moves on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecallVerdict {
    pub word: Word,
    pub answer: String,
    pub correct: bool,
}

/// Compare a typed answer to the headword, ignoring case and outer whitespace.
pub fn answer_matches(answer: &str, headword: &str) -> bool {
    answer.trim().to_lowercase() == headword.trim().to_lowercase()
}

#[derive(Debug, Clone)]
pub struct RecallSession {
    core: SessionCore,
    input: String,
    verdict: Option<RecallVerdict>,
}

impl RecallSession {
    pub fn start(store: &dyn WordStore, spec: PoolSpec) -> Result<Self> {
        let core = SessionCore::start(store, PracticeMode::Recall, spec, QUIZ_MIN_POOL)?;
        Ok(Self {
            core,
            input: String::new(),
            verdict: None,
        })
    }

    /// Word being asked for. While a verdict is shown this is the answered word.
    pub fn current(&self) -> Option<&Word> {
        match &self.verdict {
            Some(verdict) => Some(&verdict.word),
            None => self.core.current(),
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replace the typed text. Ignored while a verdict is shown.
    pub fn set_input(&mut self, text: impl Into<String>) {
        if self.verdict.is_none() {
            self.input = text.into();
        }
    }

    pub fn verdict(&self) -> Option<&RecallVerdict> {
        self.verdict.as_ref()
    }

    /// Check the typed text against the current headword.
    ///
    /// Returns `None` if the card was already checked.
    pub fn check(&mut self, store: &mut dyn WordStore) -> Result<Option<Judgment>> {
        if self.verdict.is_some() {
            return Ok(None);
        }
        let word = self
            .core
            .current()
            .cloned()
            .ok_or_else(|| VocabError::InvalidState("recall is completed".to_string()))?;

        let correct = answer_matches(&self.input, &word.headword);
        let judgment = self.core.judge(store, correct)?;
        self.verdict = Some(RecallVerdict {
            word,
            answer: std::mem::take(&mut self.input),
            correct,
        });
        Ok(Some(judgment))
    }

    /// Clear the verdict and show the next word.
    pub fn next(&mut self) {
        if self.verdict.take().is_some() {
            self.input.clear();
        }
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

    pub fn restart(&mut self, store: &dyn WordStore) -> Result<()> {
        self.core.restart(store)?;
        self.input.clear();
        self.verdict = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MasteryStatus, WordDraft};
    use crate::store::Library;

    #[test]
    fn test_answer_matching() {
        assert!(answer_matches("  Apple ", "apple"));
        assert!(answer_matches("NEW YORK", "New York"));
        assert!(!answer_matches("apples", "apple"));
        assert!(!answer_matches("new  york", "new york"));
    }

    #[test]
    fn test_wrong_recall_revokes_flashcard() {
        let mut library = Library::new();
        let section = library.default_section().unwrap();
        let id = library.create_word(WordDraft::new(section, "apple")).unwrap();
        library
            .update_word(
                id,
                crate::store::WordPatch::progress(
                    [PracticeMode::Flashcard, PracticeMode::Recall]
                        .into_iter()
                        .collect(),
                ),
            )
            .unwrap();

        let mut session = RecallSession::start(&library, PoolSpec::new()).unwrap();
        session.set_input("appel");
        let judgment = session.check(&mut library).unwrap().unwrap();
        assert!(!judgment.correct);

        let stored = library.get_word(id).unwrap();
        assert!(stored.passed_modes.is_empty());
        assert_eq!(stored.status, MasteryStatus::New);

        assert_eq!(session.verdict().unwrap().answer, "appel");
        assert!(session.check(&mut library).unwrap().is_none());
        session.next();
        assert!(session.is_completed());
        assert!(session.current().is_none());
    }
}
