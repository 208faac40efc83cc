//! Lyric scan and vocabulary index benchmarks.
//!
//! Measures how the scanner scales with lyric length and vocabulary size.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use vocabmaster::annotate::{scan, PendingTerms, VocabularyIndex};
use vocabmaster::{Library, VocabConfig, WordDraft, WordStore};

const VERSE: &str = "I give up on teaching, running away from the city lights.\n\
Take off your coat, we're breaking news tonight and the empire falls.\n\
Oh-oh, can't let go of the fading promises we made.\n";

/// Generate a lyric of `verses` repeated verses.
fn generate_lyric(verses: usize) -> String {
    VERSE.repeat(verses)
}

/// Library with `words` headwords; every fifth one is a two-word phrase.
fn generate_library(words: usize) -> Library {
    let stems = ["teach", "run", "city", "light", "coat", "news", "empire", "promise", "fade", "night"];
    let mut library = Library::new();
    let section = library.default_section().unwrap();
    for i in 0..words {
        let stem = stems[i % stems.len()];
        let headword = if i % 5 == 0 {
            format!("{stem}{i} {}", stems[(i + 3) % stems.len()])
        } else {
            format!("{stem}{i}")
        };
        library.create_word(WordDraft::new(section, headword)).unwrap();
    }
    for phrase in ["give up", "take off", "breaking news", "let go"] {
        library.create_word(WordDraft::new(section, phrase)).unwrap();
    }
    library
}

/// Benchmark scanning lyrics of various lengths.
fn bench_scan_lyric_length(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan_lyric_length");

    let library = generate_library(200);
    let index = VocabularyIndex::from_store(&library, &VocabConfig::default());
    let pending = PendingTerms::new(["city lights", "coat"]);

    for verses in [1, 10, 100].iter() {
        let lyric = generate_lyric(*verses);
        group.throughput(Throughput::Bytes(lyric.len() as u64));
        group.bench_with_input(BenchmarkId::new("verses", verses), &lyric, |b, lyric| {
            b.iter(|| black_box(scan(lyric, &index, &pending, 4)))
        });
    }

    group.finish();
}

/// Benchmark scanning with growing vocabularies.
fn bench_scan_vocabulary_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan_vocabulary_size");

    let lyric = generate_lyric(10);
    let pending = PendingTerms::default();

    for words in [10, 100, 1_000].iter() {
        let library = generate_library(*words);
        let index = VocabularyIndex::from_store(&library, &VocabConfig::default());
        group.bench_with_input(BenchmarkId::new("words", words), &index, |b, index| {
            b.iter(|| black_box(scan(&lyric, index, &pending, 4)))
        });
    }

    group.finish();
}

/// Benchmark building the vocabulary index.
fn bench_index_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_build");

    for words in [100, 1_000].iter() {
        let library = generate_library(*words);
        group.bench_with_input(BenchmarkId::new("words", words), &library, |b, library| {
            b.iter(|| black_box(VocabularyIndex::from_store(library, &VocabConfig::default())))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_scan_lyric_length,
    bench_scan_vocabulary_size,
    bench_index_build,
);
criterion_main!(benches);
