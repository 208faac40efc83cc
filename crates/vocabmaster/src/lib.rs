//! VocabMaster: vocabulary practice and lyric annotation.
//!
//! The library has two engines over a shared word store:
//!
//! - **Practice**: flashcard, quiz, and recall drills over a filtered pool.
//!   Every judgment goes through [`mastery::compute`], which keeps the
//!   cross-mode status rules in one place.
//! - **Annotation**: scans song lyrics against the vocabulary, highlights
//!   known words and phrases, and turns selections into new words with the
//!   help of an optional translation oracle.
//!
//! # Example
//!
//! ```no_run
//! use vocabmaster::{PoolSpec, VocabMaster};
//!
//! let vm = VocabMaster::new();
//! let mut quiz = vm.start_quiz(PoolSpec::new()).unwrap();
//! let card = quiz.current().unwrap();
//! println!("{} ({} options)", card.target.headword, card.options.len());
//! ```

pub mod annotate;
pub mod config;
pub mod enrich;
pub mod error;
pub mod mastery;
pub mod model;
pub mod oracle;
pub mod practice;
pub mod store;

mod vocab;

pub use crate::vocab::VocabMaster;
pub use annotate::{AnnotationSession, CommitReport, Popup, PopupAction, Span, SpanKind, Translation};
pub use config::VocabConfig;
pub use enrich::{FillReport, LookupMode, TranslationChoices};
pub use error::{Result, VocabError};
pub use mastery::MasteryOutcome;
pub use model::{
    Collection, Level, MasteryStatus, PracticeMode, Section, Song, SongFolder, Word, WordClass,
    WordDraft, WordId,
};
pub use oracle::{
    AnthropicOracle, FillField, LinguisticRecord, MockOracle, OpenRouterOracle, OracleConfig,
    TranslationOracle,
};
pub use practice::{
    FlashcardSession, Judgment, PoolSpec, QuizSession, RecallSession, SessionProgress,
    SessionSummary,
};
pub use store::{CatalogStore, Deletion, Library, Scope, WordFilter, WordPatch, WordStore};
