//! Multiple-choice quiz: pick the right translation for the shown headword.

use fastrand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, VocabError};
use crate::model::{PracticeMode, Word};
use crate::store::WordStore;

use super::pool::{PoolSpec, QUIZ_MIN_POOL};
use super::session::{Judgment, SessionCore, SessionProgress, SessionSummary};

/// One quiz question: the target word and its shuffled options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizCard {
    pub target: Word,
    /// Target plus distractors in display order.
    pub options: Vec<Word>,
    /// Index into `options` once the learner has answered.
    pub selected: Option<usize>,
}

impl QuizCard {
    pub fn is_answered(&self) -> bool {
        self.selected.is_some()
    }

    /// Position of the target inside `options`.
    pub fn answer_index(&self) -> Option<usize> {
        self.options.iter().position(|w| w.id == self.target.id)
    }

    pub fn is_correct(&self) -> Option<bool> {
        self.selected
            .map(|i| self.options.get(i).is_some_and(|w| w.id == self.target.id))
    }
}

/// Build the option set for `pool[target]`.
///
/// Picks `count - 1` distinct distractors from the rest of the pool, adds the
/// target, and shuffles. The pool must hold at least `count` words.
pub fn generate_options(pool: &[Word], target: usize, count: usize, rng: &mut Rng) -> Vec<Word> {
    let mut others: Vec<usize> = (0..pool.len()).filter(|&i| i != target).collect();
    rng.shuffle(&mut others);

    let mut options: Vec<Word> = others
        .into_iter()
        .take(count.saturating_sub(1))
        .map(|i| pool[i].clone())
        .collect();
    if let Some(word) = pool.get(target) {
        options.push(word.clone());
    }
    rng.shuffle(&mut options);
    options
}

/// A quiz session. Options are generated once per card, on entering it.
#[derive(Debug, Clone)]
pub struct QuizSession {
    core: SessionCore,
    option_count: usize,
    rng: Rng,
    card: Option<QuizCard>,
}

impl QuizSession {
    /// Start a quiz with four options per card. Needs at least four words.
    pub fn start(store: &dyn WordStore, spec: PoolSpec) -> Result<Self> {
        Self::start_with(store, spec, QUIZ_MIN_POOL, Rng::new())
    }

    /// Start with an explicit option count and random source.
    ///
    /// The pool must hold at least [`QUIZ_MIN_POOL`] words, or the option
    /// count if that is larger.
    pub fn start_with(
        store: &dyn WordStore,
        spec: PoolSpec,
        option_count: usize,
        rng: Rng,
    ) -> Result<Self> {
        let option_count = option_count.max(2);
        let quiz_min = option_count.max(QUIZ_MIN_POOL);
        let core = SessionCore::start(store, PracticeMode::Quiz, spec, quiz_min)?;
        let mut session = Self {
            core,
            option_count,
            rng,
            card: None,
        };
        session.deal();
        Ok(session)
    }

    fn deal(&mut self) {
        self.card = self.core.current().cloned().map(|target| {
            let options = generate_options(
                self.core.pool(),
                self.core.index(),
                self.option_count,
                &mut self.rng,
            );
            QuizCard {
                target,
                options,
                selected: None,
            }
        });
    }

    /// The card on screen. Stays on the answered card until [`next`](Self::next).
    pub fn current(&self) -> Option<&QuizCard> {
        self.card.as_ref()
    }

    /// Answer the current card. Repeat answers on the same card return `None`.
    pub fn select(&mut self, store: &mut dyn WordStore, option: usize) -> Result<Option<Judgment>> {
        let Some(card) = self.card.as_mut() else {
            return Err(VocabError::InvalidState("quiz is completed".to_string()));
        };
        if card.is_answered() {
            return Ok(None);
        }
        let chosen = card.options.get(option).ok_or_else(|| {
            VocabError::InvalidInput(format!(
                "option {} out of range (0..{})",
                option,
                card.options.len()
            ))
        })?;
        let correct = chosen.id == card.target.id;
        card.selected = Some(option);

        self.core.judge(store, correct).map(Some)
    }

    /// Move past an answered card. Does nothing while the card is unanswered.
    pub fn next(&mut self) {
        if self.card.as_ref().is_some_and(QuizCard::is_answered) {
            self.deal();
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
        self.deal();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MasteryStatus, WordDraft};
    use crate::store::Library;

    fn library_with(words: &[&str]) -> Library {
        let mut library = Library::new();
        let section = library.default_section().unwrap();
        for hw in words {
            library
                .create_word(WordDraft::new(section, *hw).with_translation(format!("{hw}-tr")))
                .unwrap();
        }
        library
    }

    #[test]
    fn test_generate_options_shape() {
        let library = library_with(&["a1", "a2", "a3", "a4", "a5", "a6"]);
        let pool = library.words().to_vec();
        let mut rng = Rng::with_seed(7);

        for target in 0..pool.len() {
            let options = generate_options(&pool, target, 4, &mut rng);
            assert_eq!(options.len(), 4);
            let hits = options.iter().filter(|w| w.id == pool[target].id).count();
            assert_eq!(hits, 1);
            let mut ids: Vec<_> = options.iter().map(|w| w.id).collect();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), 4);
        }
    }

    #[test]
    fn test_fewer_options_keep_the_pool_floor() {
        let library = library_with(&["a1", "a2", "a3"]);
        let err = QuizSession::start_with(&library, PoolSpec::new(), 3, Rng::with_seed(1))
            .unwrap_err();
        assert!(matches!(
            err,
            VocabError::InsufficientPool {
                required: QUIZ_MIN_POOL,
                available: 3
            }
        ));

        let library = library_with(&["a1", "a2", "a3", "a4"]);
        let quiz = QuizSession::start_with(&library, PoolSpec::new(), 3, Rng::with_seed(1)).unwrap();
        assert_eq!(quiz.current().unwrap().options.len(), 3);
    }

    #[test]
    fn test_insufficient_pool() {
        let library = library_with(&["a1", "a2", "a3"]);
        assert!(matches!(
            QuizSession::start(&library, PoolSpec::new()),
            Err(VocabError::InsufficientPool {
                required: 4,
                available: 3
            })
        ));
    }

    #[test]
    fn test_options_are_stable_until_next() {
        let mut library = library_with(&["apple", "banana", "cherry", "date"]);
        let mut session =
            QuizSession::start_with(&library, PoolSpec::new(), 4, Rng::with_seed(1)).unwrap();

        let before = session.current().unwrap().options.clone();
        assert_eq!(session.current().unwrap().options, before);

        let answer = session.current().unwrap().answer_index().unwrap();
        let judgment = session.select(&mut library, answer).unwrap().unwrap();
        assert!(judgment.correct);
        assert_eq!(
            judgment.outcome.map(|o| o.status),
            Some(MasteryStatus::Learning)
        );

        // A second answer on the same card is ignored.
        assert!(session.select(&mut library, 0).unwrap().is_none());
        assert_eq!(session.progress().correct, 1);
        assert_eq!(session.current().unwrap().options, before);

        session.next();
        assert!(!session.current().unwrap().is_answered());
        assert_eq!(session.progress().index, 1);
    }

    #[test]
    fn test_next_without_answer_keeps_card() {
        let library = library_with(&["apple", "banana", "cherry", "date"]);
        let mut session =
            QuizSession::start_with(&library, PoolSpec::new(), 4, Rng::with_seed(3)).unwrap();
        let target = session.current().unwrap().target.id;
        session.next();
        assert_eq!(session.current().unwrap().target.id, target);
    }

    #[test]
    fn test_out_of_range_option() {
        let mut library = library_with(&["apple", "banana", "cherry", "date"]);
        let mut session = QuizSession::start(&library, PoolSpec::new()).unwrap();
        assert!(matches!(
            session.select(&mut library, 9),
            Err(VocabError::InvalidInput(_))
        ));
        assert!(!session.current().unwrap().is_answered());
    }
}
