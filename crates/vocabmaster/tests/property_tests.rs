//! Property-based tests for the scanner, matcher, mastery rules, and quiz
//! option generation.
//!
//! ```bash
//! cargo test -p vocabmaster --test property_tests
//!
//! # More cases
//! PROPTEST_CASES=10000 cargo test -p vocabmaster --test property_tests
//! ```

use std::collections::BTreeSet;

use fastrand::Rng;
use proptest::prelude::*;

use vocabmaster::annotate::{is_match, normalize_selection, scan, PendingTerms, VocabularyIndex};
use vocabmaster::mastery::{compute, status_for};
use vocabmaster::practice::generate_options;
use vocabmaster::{Library, MasteryStatus, PracticeMode, VocabConfig, Word, WordDraft, WordStore};

// =============================================================================
// Test Strategies
// =============================================================================

/// Lyric-like text: words, punctuation, line breaks, the odd non-ASCII letter.
fn lyric_text() -> impl Strategy<Value = String> {
    "[a-zA-Z ,.!?'\\-\n–éя]{0,200}"
}

fn headwords() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[a-z]{1,8}( [a-z]{2,8})?", 0..12)
        .prop_map(|set| set.into_iter().collect())
}

fn modes() -> impl Strategy<Value = BTreeSet<PracticeMode>> {
    prop::collection::btree_set(
        prop_oneof![
            Just(PracticeMode::Flashcard),
            Just(PracticeMode::Quiz),
            Just(PracticeMode::Recall),
        ],
        0..=3,
    )
}

fn mode() -> impl Strategy<Value = PracticeMode> {
    prop_oneof![
        Just(PracticeMode::Flashcard),
        Just(PracticeMode::Quiz),
        Just(PracticeMode::Recall),
    ]
}

fn index_of(words: &[String]) -> VocabularyIndex {
    let mut library = Library::new();
    let section = library.default_section().expect("seeded section");
    for hw in words {
        let _ = library.create_word(WordDraft::new(section, hw.as_str()));
    }
    VocabularyIndex::from_store(&library, &VocabConfig::default())
}

fn pool_of(size: usize) -> Vec<Word> {
    let mut library = Library::new();
    let section = library.default_section().expect("seeded section");
    for i in 0..size {
        library
            .create_word(WordDraft::new(section, format!("word{i}")))
            .expect("create word");
    }
    library.words().to_vec()
}

// =============================================================================
// Scanner
// =============================================================================

proptest! {
    /// Spans tile the text exactly, in order, and each span's text is its range.
    #[test]
    fn scan_covers_text(text in lyric_text(), words in headwords(), pending in headwords()) {
        let index = index_of(&words);
        let pending = PendingTerms::new(&pending);
        let spans = scan(&text, &index, &pending, 4);

        let mut at = 0;
        for span in &spans {
            prop_assert_eq!(span.range.start, at);
            prop_assert_eq!(&text[span.range.clone()], span.text.as_str());
            prop_assert!(!span.text.is_empty());
            at = span.range.end;
        }
        prop_assert_eq!(at, text.len());

        let rebuilt: String = spans.iter().map(|s| s.text.as_str()).collect();
        prop_assert_eq!(rebuilt, text);
    }

    /// No two plain spans sit next to each other.
    #[test]
    fn scan_merges_plain_runs(text in lyric_text(), words in headwords()) {
        let index = index_of(&words);
        let spans = scan(&text, &index, &PendingTerms::default(), 4);
        for pair in spans.windows(2) {
            prop_assert!(!(pair[0].is_plain() && pair[1].is_plain()));
        }
    }

    /// Scanning is deterministic.
    #[test]
    fn scan_is_deterministic(text in lyric_text(), words in headwords()) {
        let index = index_of(&words);
        let pending = PendingTerms::default();
        prop_assert_eq!(scan(&text, &index, &pending, 4), scan(&text, &index, &pending, 4));
    }
}

// =============================================================================
// Matcher
// =============================================================================

proptest! {
    #[test]
    fn fuzzy_match_is_symmetric(a in "[a-z]{0,10}", b in "[a-z]{0,10}") {
        prop_assert_eq!(is_match(&a, &b), is_match(&b, &a));
    }

    #[test]
    fn fuzzy_match_is_reflexive(a in "[a-z]{0,10}") {
        prop_assert!(is_match(&a, &a));
    }

    #[test]
    fn short_tokens_only_match_exactly(a in "[a-z]{1,3}", b in "[a-z]{1,10}") {
        prop_assert_eq!(is_match(&a, &b), a == b);
    }

    #[test]
    fn normalize_is_idempotent(raw in "[a-zA-Z ,.!?;:()\"'\\-\n\r\t]{0,80}") {
        let once = normalize_selection(&raw);
        prop_assert_eq!(normalize_selection(&once), once.clone());
        prop_assert!(!once.starts_with(' ') && !once.ends_with(' '));
        prop_assert!(!once.contains("  "));
    }
}

// =============================================================================
// Mastery
// =============================================================================

proptest! {
    /// Status always reflects the size of the passed set.
    #[test]
    fn compute_status_matches_set(before in modes(), mode in mode(), correct in any::<bool>()) {
        let outcome = compute(&before, mode, correct);
        prop_assert_eq!(outcome.status, status_for(&outcome.passed_modes));
        if correct {
            prop_assert!(outcome.passed_modes.contains(&mode));
        } else {
            prop_assert!(!outcome.passed_modes.contains(&mode));
            prop_assert!(!outcome.passed_modes.contains(&PracticeMode::Flashcard));
        }
    }

    /// A judgment never touches modes other than its own, except flashcard
    /// credit on a wrong answer.
    #[test]
    fn compute_leaves_other_modes(before in modes(), mode in mode(), correct in any::<bool>()) {
        let outcome = compute(&before, mode, correct);
        for other in [PracticeMode::Quiz, PracticeMode::Recall] {
            if other != mode {
                prop_assert_eq!(before.contains(&other), outcome.passed_modes.contains(&other));
            }
        }
    }

    #[test]
    fn all_three_modes_means_learned(mode in mode()) {
        let before: BTreeSet<PracticeMode> =
            [PracticeMode::Flashcard, PracticeMode::Quiz, PracticeMode::Recall].into_iter().collect();
        let outcome = compute(&before, mode, true);
        prop_assert_eq!(outcome.status, MasteryStatus::Learned);
    }
}

// =============================================================================
// Quiz options
// =============================================================================

proptest! {
    #[test]
    fn quiz_options_are_distinct_and_hold_target(
        size in 4usize..20,
        target_seed in any::<usize>(),
        seed in any::<u64>(),
    ) {
        let pool = pool_of(size);
        let target = target_seed % size;
        let mut rng = Rng::with_seed(seed);

        let options = generate_options(&pool, target, 4, &mut rng);
        prop_assert_eq!(options.len(), 4);

        let ids: BTreeSet<u64> = options.iter().map(|w| w.id).collect();
        prop_assert_eq!(ids.len(), 4);
        prop_assert!(ids.contains(&pool[target].id));
    }
}
