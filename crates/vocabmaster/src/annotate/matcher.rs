//! Token matching and selection normalization.

use once_cell::sync::Lazy;
use regex::Regex;

/// Shortest length at which prefix matching kicks in.
pub const FUZZY_MIN_LEN: usize = 4;

static SELECTION_PUNCT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[.,!?;:()"'\-–—\n\r]"#).unwrap());

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Permissive token equality: equal, or one is a prefix of the other when
/// both are at least four characters long.
pub fn is_match(a: &str, b: &str) -> bool {
    is_match_with(a, b, FUZZY_MIN_LEN)
}

/// [`is_match`] with an explicit minimum length.
pub fn is_match_with(a: &str, b: &str, min_len: usize) -> bool {
    if a == b {
        return true;
    }
    if a.chars().count() < min_len || b.chars().count() < min_len {
        return false;
    }
    a.starts_with(b) || b.starts_with(a)
}

/// Normalize a raw text selection: lowercase, punctuation and newlines to
/// spaces, whitespace collapsed, trimmed.
pub fn normalize_selection(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let spaced = SELECTION_PUNCT.replace_all(&lowered, " ");
    WHITESPACE.replace_all(&spaced, " ").trim().to_string()
}

/// Tag attached to words committed from a song: lowercase title with
/// whitespace runs replaced by `-`.
pub fn song_tag(title: &str) -> String {
    WHITESPACE.replace_all(&title.to_lowercase(), "-").into_owned()
}

/// Keep only ASCII letters.
pub fn strip_non_letters(s: &str) -> String {
    s.chars().filter(char::is_ascii_alphabetic).collect()
}

/// Byte offset of the first ASCII letter in `s`, or `s.len()`.
pub fn leading_non_letters(s: &str) -> usize {
    s.find(|c: char| c.is_ascii_alphabetic()).unwrap_or(s.len())
}

/// If `text` starts with `prefix` ignoring case, the byte length of the
/// matched part of `text`.
///
/// `prefix` must already be lowercase.
pub fn match_prefix_ci(text: &str, prefix: &str) -> Option<usize> {
    let mut text_chars = text.char_indices();
    let mut end = 0;
    for expected in prefix.chars() {
        let (at, actual) = text_chars.next()?;
        if !actual.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
        end = at + actual.len_utf8();
    }
    Some(end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuzzy_match() {
        assert!(is_match("teach", "teaching"));
        assert!(is_match("teaching", "teach"));
        assert!(is_match("run", "run"));
        assert!(!is_match("run", "running"));
        assert!(!is_match("teach", "reach"));
        assert!(is_match_with("run", "running", 3));
    }

    #[test]
    fn test_normalize_selection() {
        assert_eq!(normalize_selection("  Hello,\nWorld! "), "hello world");
        assert_eq!(normalize_selection("(Don't)"), "don t");
        assert_eq!(normalize_selection("well—known"), "well known");
        assert_eq!(normalize_selection("..."), "");
    }

    #[test]
    fn test_song_tag() {
        assert_eq!(song_tag("Bohemian  Rhapsody"), "bohemian-rhapsody");
        assert_eq!(song_tag("Yesterday"), "yesterday");
    }

    #[test]
    fn test_prefix_match() {
        assert_eq!(match_prefix_ci("New York city", "new york"), Some(8));
        assert_eq!(match_prefix_ci("New Yor", "new york"), None);
        assert_eq!(match_prefix_ci("Nex York", "new york"), None);
        assert_eq!(leading_non_letters("  (new"), 3);
        assert_eq!(strip_non_letters("rock'n'roll!"), "rocknroll");
    }
}
