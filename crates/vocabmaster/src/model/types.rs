//! Enumerations shared by words, sessions, and oracle records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Grammatical class of a headword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordClass {
    Noun,
    Verb,
    Adjective,
    Adverb,
    #[serde(alias = "phrasal verb")]
    PhrasalVerb,
    Idiom,
    Phrase,
    Preposition,
    Conjunction,
    Interjection,
}

impl WordClass {
    /// All classes in display order.
    pub const ALL: [WordClass; 10] = [
        WordClass::Noun,
        WordClass::Verb,
        WordClass::Adjective,
        WordClass::Adverb,
        WordClass::PhrasalVerb,
        WordClass::Idiom,
        WordClass::Phrase,
        WordClass::Preposition,
        WordClass::Conjunction,
        WordClass::Interjection,
    ];

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            WordClass::Noun => "noun",
            WordClass::Verb => "verb",
            WordClass::Adjective => "adjective",
            WordClass::Adverb => "adverb",
            WordClass::PhrasalVerb => "phrasal verb",
            WordClass::Idiom => "idiom",
            WordClass::Phrase => "phrase",
            WordClass::Preposition => "preposition",
            WordClass::Conjunction => "conjunction",
            WordClass::Interjection => "interjection",
        }
    }
}

impl Default for WordClass {
    fn default() -> Self {
        WordClass::Phrase
    }
}

impl fmt::Display for WordClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for WordClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', '-'], " ");
        WordClass::ALL
            .into_iter()
            .find(|class| class.label() == normalized)
            .ok_or_else(|| format!("Unknown word class: {}", s))
    }
}

/// CEFR proficiency level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Level {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl Level {
    /// All levels from beginner to mastery.
    pub const ALL: [Level; 6] = [Level::A1, Level::A2, Level::B1, Level::B2, Level::C1, Level::C2];

    pub fn label(&self) -> &'static str {
        match self {
            Level::A1 => "A1",
            Level::A2 => "A2",
            Level::B1 => "B1",
            Level::B2 => "B2",
            Level::C1 => "C1",
            Level::C2 => "C2",
        }
    }
}

impl Default for Level {
    fn default() -> Self {
        Level::B1
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Level::ALL
            .into_iter()
            .find(|level| level.label() == upper)
            .ok_or_else(|| format!("Unknown level: {}. Use A1-C2.", s))
    }
}

/// A practice drill. Ordering is flashcard < quiz < recall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PracticeMode {
    #[serde(alias = "cards")]
    Flashcard,
    Quiz,
    #[serde(alias = "write")]
    Recall,
}

impl PracticeMode {
    pub const ALL: [PracticeMode; 3] = [PracticeMode::Flashcard, PracticeMode::Quiz, PracticeMode::Recall];

    pub fn label(&self) -> &'static str {
        match self {
            PracticeMode::Flashcard => "flashcard",
            PracticeMode::Quiz => "quiz",
            PracticeMode::Recall => "recall",
        }
    }
}

impl fmt::Display for PracticeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PracticeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "flashcard" | "flashcards" | "cards" => Ok(PracticeMode::Flashcard),
            "quiz" => Ok(PracticeMode::Quiz),
            "recall" | "write" => Ok(PracticeMode::Recall),
            _ => Err(format!("Unknown mode: {}. Use cards, quiz, or recall.", s)),
        }
    }
}

/// Derived mastery classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MasteryStatus {
    /// No mode passed.
    New,
    /// One or two modes passed.
    Learning,
    /// Every mode passed.
    Learned,
}

impl MasteryStatus {
    pub fn label(&self) -> &'static str {
        match self {
            MasteryStatus::New => "new",
            MasteryStatus::Learning => "learning",
            MasteryStatus::Learned => "learned",
        }
    }
}

impl Default for MasteryStatus {
    fn default() -> Self {
        MasteryStatus::New
    }
}

impl fmt::Display for MasteryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MasteryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "new" => Ok(MasteryStatus::New),
            "learning" => Ok(MasteryStatus::Learning),
            "learned" => Ok(MasteryStatus::Learned),
            _ => Err(format!("Unknown status: {}. Use new, learning, or learned.", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_class_parsing() {
        assert_eq!("phrasal verb".parse::<WordClass>(), Ok(WordClass::PhrasalVerb));
        assert_eq!("Phrasal_Verb".parse::<WordClass>(), Ok(WordClass::PhrasalVerb));
        assert_eq!("NOUN".parse::<WordClass>(), Ok(WordClass::Noun));
        assert!("gerund".parse::<WordClass>().is_err());
    }

    #[test]
    fn test_level_parsing() {
        assert_eq!("b2".parse::<Level>(), Ok(Level::B2));
        assert!("D1".parse::<Level>().is_err());
    }

    #[test]
    fn test_mode_legacy_names() {
        let modes: Vec<PracticeMode> = serde_json::from_str(r#"["cards", "quiz", "write"]"#).unwrap();
        assert_eq!(
            modes,
            vec![PracticeMode::Flashcard, PracticeMode::Quiz, PracticeMode::Recall]
        );
        assert_eq!(
            serde_json::to_string(&PracticeMode::Flashcard).unwrap(),
            "\"flashcard\""
        );
    }
}
