//! Lyric annotation engine.
//!
//! Scans song text against the vocabulary and the learner's pending
//! selections, and runs the select → translate → add → commit workflow for
//! turning lyrics into new words.

mod cache;
mod index;
mod matcher;
mod scan;
mod session;

pub use cache::TranslationCache;
pub use index::{vocabulary_fingerprint, PhraseRef, VocabMatch, VocabularyIndex};
pub use matcher::{
    is_match, is_match_with, leading_non_letters, match_prefix_ci, normalize_selection, song_tag,
    strip_non_letters, FUZZY_MIN_LEN,
};
pub use scan::{scan, PendingTerms, Scanner, Span, SpanKind};
pub use session::{
    AnnotationSession, CommitReport, DuplicateEntry, LookupRequest, PendingSelection, Popup,
    PopupAction, Translation,
};
