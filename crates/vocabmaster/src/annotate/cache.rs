//! Per-session translation cache.

use std::collections::HashMap;

/// Normalized text → last oracle translation. Lives as long as one
/// annotation session and is never persisted.
#[derive(Debug, Clone, Default)]
pub struct TranslationCache {
    entries: HashMap<String, String>,
}

impl TranslationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, text: &str) -> Option<&str> {
        self.entries.get(text).map(String::as_str)
    }

    pub fn insert(&mut self, text: impl Into<String>, translation: impl Into<String>) {
        self.entries.insert(text.into(), translation.into());
    }

    pub fn contains(&self, text: &str) -> bool {
        self.entries.contains_key(text)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
