//! Fuzz target for the lyric scanner.
//!
//! Checks that scanning never panics and that the spans always tile the
//! input text exactly.

#![no_main]

use libfuzzer_sys::fuzz_target;
use vocabmaster::annotate::{scan, PendingTerms, VocabularyIndex};
use vocabmaster::{Library, VocabConfig, WordDraft, WordStore};

fuzz_target!(|data: (&str, Vec<&str>, Vec<&str>)| {
    let (text, words, pending) = data;
    if text.len() > 10_000 || words.len() > 64 || pending.len() > 64 {
        return;
    }

    let mut library = Library::new();
    let Some(section) = library.default_section() else {
        return;
    };
    for word in words {
        let _ = library.create_word(WordDraft::new(section, word));
    }
    let index = VocabularyIndex::from_store(&library, &VocabConfig::default());
    let pending = PendingTerms::new(pending.iter().map(|p| p.to_lowercase()));

    let spans = scan(text, &index, &pending, 4);
    let rebuilt: String = spans.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(rebuilt, text);
});
