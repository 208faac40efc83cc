//! Left-to-right lyric scan producing tagged spans.
//!
//! At each cursor position the scanner tries, in order: pending phrases
//! (longest first), vocabulary phrases (longest first), then a single run of
//! ASCII letters. Anything else is emitted one character at a time as plain
//! text. Concatenating the span texts always reproduces the input.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::index::{PhraseRef, VocabMatch, VocabularyIndex};
use super::matcher::{is_match_with, leading_non_letters, match_prefix_ci};

/// How a span should be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "refs", rename_all = "snake_case")]
pub enum SpanKind {
    Plain,
    /// In the pending selection list.
    Selected,
    /// Matches existing vocabulary; carries tooltip entries.
    Known(Vec<VocabMatch>),
    /// A long fragment of one or more vocabulary phrases.
    RelatedToPhrase(Vec<PhraseRef>),
}

/// A slice of the scanned text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub text: String,
    /// Byte range in the source text.
    pub range: Range<usize>,
    pub kind: SpanKind,
}

impl Span {
    pub fn is_plain(&self) -> bool {
        self.kind == SpanKind::Plain
    }
}

/// Pending selections split the way the scanner consumes them.
#[derive(Debug, Clone, Default)]
pub struct PendingTerms {
    /// Entries containing a space, longest first.
    phrases: Vec<String>,
    tokens: Vec<String>,
}

impl PendingTerms {
    pub fn new<I, S>(pending: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut phrases = Vec::new();
        let mut tokens = Vec::new();
        for term in pending {
            let term = term.as_ref();
            if term.contains(' ') {
                phrases.push(term.to_string());
            } else {
                tokens.push(term.to_string());
            }
        }
        phrases.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));
        Self { phrases, tokens }
    }
}

/// Lazy span producer over an immutable text.
pub struct Scanner<'a> {
    text: &'a str,
    index: &'a VocabularyIndex,
    pending: &'a PendingTerms,
    fuzzy_min_len: usize,
    pos: usize,
    queued: Option<Span>,
}

impl<'a> Scanner<'a> {
    pub fn new(
        text: &'a str,
        index: &'a VocabularyIndex,
        pending: &'a PendingTerms,
        fuzzy_min_len: usize,
    ) -> Self {
        Self {
            text,
            index,
            pending,
            fuzzy_min_len,
            pos: 0,
            queued: None,
        }
    }

    fn span(&self, range: Range<usize>, kind: SpanKind) -> Span {
        Span {
            text: self.text[range.clone()].to_string(),
            range,
            kind,
        }
    }

    /// Emit an optional plain prefix, queue the phrase span after it.
    fn phrase(&mut self, skip: usize, len: usize, kind: SpanKind) -> Span {
        let start = self.pos;
        let phrase = self.span(start + skip..start + skip + len, kind);
        self.pos = start + skip + len;
        if skip == 0 {
            return phrase;
        }
        self.queued = Some(phrase);
        self.span(start..start + skip, SpanKind::Plain)
    }

    fn try_phrase(&mut self) -> Option<Span> {
        let remaining = &self.text[self.pos..];
        let skip = leading_non_letters(remaining);
        let clean = &remaining[skip..];
        if clean.is_empty() {
            return None;
        }

        let pending = self
            .pending
            .phrases
            .iter()
            .find_map(|p| match_prefix_ci(clean, p));
        if let Some(len) = pending {
            return Some(self.phrase(skip, len, SpanKind::Selected));
        }

        let known = self
            .index
            .phrases()
            .find_map(|p| match_prefix_ci(clean, p).map(|len| (len, p)));
        if let Some((len, phrase)) = known {
            let matches = self.index.matches(phrase);
            return Some(self.phrase(skip, len, SpanKind::Known(matches)));
        }
        None
    }

    fn token(&mut self) -> Span {
        let start = self.pos;
        let len = self.text[start..]
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(self.text.len() - start);
        let end = start + len;
        self.pos = end;

        let token = self.text[start..end].to_ascii_lowercase();
        let min = self.fuzzy_min_len;
        let kind = if self
            .pending
            .tokens
            .iter()
            .any(|t| is_match_with(&token, t, min))
        {
            SpanKind::Selected
        } else {
            let matches = self.index.matches(&token);
            if !matches.is_empty() {
                SpanKind::Known(matches)
            } else if let Some(phrases) = self.index.fragment(&token) {
                SpanKind::RelatedToPhrase(phrases.to_vec())
            } else {
                SpanKind::Plain
            }
        };
        self.span(start..end, kind)
    }
}

impl Iterator for Scanner<'_> {
    type Item = Span;

    fn next(&mut self) -> Option<Span> {
        if let Some(span) = self.queued.take() {
            return Some(span);
        }
        if self.pos >= self.text.len() {
            return None;
        }
        if let Some(span) = self.try_phrase() {
            return Some(span);
        }

        let c = self.text[self.pos..].chars().next()?;
        if c.is_ascii_alphabetic() {
            return Some(self.token());
        }
        let start = self.pos;
        self.pos += c.len_utf8();
        Some(self.span(start..self.pos, SpanKind::Plain))
    }
}

/// Scan `text` and merge adjacent plain spans.
pub fn scan(
    text: &str,
    index: &VocabularyIndex,
    pending: &PendingTerms,
    fuzzy_min_len: usize,
) -> Vec<Span> {
    let mut spans: Vec<Span> = Vec::new();
    for span in Scanner::new(text, index, pending, fuzzy_min_len) {
        match spans.last_mut() {
            Some(last) if last.is_plain() && span.is_plain() => {
                last.text.push_str(&span.text);
                last.range.end = span.range.end;
            }
            _ => spans.push(span),
        }
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VocabConfig;
    use crate::model::WordDraft;
    use crate::store::{Library, WordStore};

    fn index_of(words: &[&str]) -> VocabularyIndex {
        let mut library = Library::new();
        let section = library.default_section().unwrap();
        for hw in words {
            library.create_word(WordDraft::new(section, *hw)).unwrap();
        }
        VocabularyIndex::from_store(&library, &VocabConfig::default())
    }

    fn run(text: &str, index: &VocabularyIndex, pending: &[&str]) -> Vec<Span> {
        scan(text, index, &PendingTerms::new(pending), 4)
    }

    fn joined(spans: &[Span]) -> String {
        spans.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_longest_phrase_wins() {
        let index = index_of(&["new york", "york"]);
        let spans = run("I love new york city", &index, &[]);
        assert_eq!(joined(&spans), "I love new york city");

        let phrase = spans.iter().find(|s| s.text == "new york").unwrap();
        assert!(matches!(phrase.kind, SpanKind::Known(_)));
        assert!(!spans.iter().any(|s| s.text == "york"));
    }

    #[test]
    fn test_pending_phrase_takes_priority() {
        let index = index_of(&["new york"]);
        let spans = run("New York, New York", &index, &["new york"]);
        let selected: Vec<_> = spans
            .iter()
            .filter(|s| s.kind == SpanKind::Selected)
            .map(|s| s.text.as_str())
            .collect();
        assert_eq!(selected, vec!["New York", "New York"]);
        assert_eq!(joined(&spans), "New York, New York");
    }

    #[test]
    fn test_token_classification() {
        let index = index_of(&["teach", "fake promises"]);
        let spans = run("Teaching: promises broken, running!", &index, &["run"]);

        let kind_of = |text: &str| spans.iter().find(|s| s.text == text).map(|s| &s.kind);
        assert!(matches!(kind_of("Teaching"), Some(SpanKind::Known(m)) if m[0].headword == "teach"));
        assert!(matches!(kind_of("promises"), Some(SpanKind::RelatedToPhrase(p)) if p[0].phrase == "fake promises"));
        // "run" is shorter than the fuzzy minimum, so "running" does not match it.
        assert!(spans.iter().all(|s| s.kind != SpanKind::Selected));
        assert_eq!(joined(&spans), "Teaching: promises broken, running!");
    }

    #[test]
    fn test_adjacent_plain_spans_merge() {
        let index = index_of(&[]);
        let spans = run("hello, world", &index, &[]);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].range, 0..12);
    }

    #[test]
    fn test_non_ascii_text_is_covered() {
        let index = index_of(&["café"]);
        let text = "Un café — très bon 123";
        let spans = run(text, &index, &[]);
        assert_eq!(joined(&spans), text);
        for span in &spans {
            assert_eq!(&text[span.range.clone()], span.text);
        }
    }
}
