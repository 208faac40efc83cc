//! Practice session engine.
//!
//! Three drills share one state machine ([`session`]): the pool is
//! snapshotted at start, each judgment writes the mastery update back
//! through the [`WordStore`](crate::store::WordStore) and advances, and the
//! session completes once every card has been judged. A completed session
//! can be restarted from the live pool; abandoning one is just dropping it.

mod flashcard;
mod pool;
mod quiz;
mod recall;
mod session;

pub use flashcard::FlashcardSession;
pub use pool::{build_pool, check_pool, snapshot_pool, PoolSpec, QUIZ_MIN_POOL};
pub use quiz::{generate_options, QuizCard, QuizSession};
pub use recall::{answer_matches, RecallSession, RecallVerdict};
pub use session::{Judgment, SessionProgress, SessionSummary};
