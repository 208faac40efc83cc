//! CLI argument definitions using clap.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use vocabmaster::{Level, MasteryStatus, PracticeMode, WordClass};

/// VocabMaster: vocabulary practice and lyric annotation
#[derive(Parser)]
#[command(name = "vocabmaster")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Library file
    #[arg(short, long, global = true, default_value = "vocabmaster.json")]
    pub library: PathBuf,

    /// Translation oracle used for lookups and popups
    #[arg(long, global = true, default_value = "none")]
    pub oracle: OracleChoice,

    /// Model to use (provider-specific, e.g. "google/gemini-2.5-flash-lite")
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new seeded library file
    Init {
        /// Overwrite an existing library
        #[arg(long)]
        force: bool,
    },

    /// List, add, or delete words
    Words {
        #[command(subcommand)]
        action: WordsAction,
    },

    /// Import `word<TAB>gloss` lines from a file
    Import {
        /// Text file with one entry per line
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Destination section id (default: first section)
        #[arg(short, long)]
        section: Option<u64>,
    },

    /// Run an interactive practice session
    Practice {
        /// Practice mode: cards, quiz, or recall
        #[arg(value_name = "MODE")]
        mode: PracticeMode,

        #[command(flatten)]
        pool: PoolArgs,
    },

    /// Annotate a song or lyric file against the vocabulary
    Annotate {
        /// Song id, or path to a lyric text file
        #[arg(value_name = "SONG")]
        target: String,

        /// Title used for tagging when annotating a file
        #[arg(short, long)]
        title: Option<String>,
    },

    /// List or add songs
    Songs {
        #[command(subcommand)]
        action: SongsAction,
    },

    /// Show vocabulary counts per mastery status
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum WordsAction {
    /// List words
    List {
        #[command(flatten)]
        pool: PoolArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a word
    Add {
        /// The word or phrase
        #[arg(value_name = "HEADWORD")]
        headword: String,

        /// Translation (skips the oracle's translation in auto mode)
        #[arg(short, long)]
        translation: Option<String>,

        /// English definition
        #[arg(short, long)]
        gloss: Option<String>,

        /// Section id (default: first section)
        #[arg(short, long)]
        section: Option<u64>,

        /// Word class
        #[arg(long)]
        class: Option<WordClass>,

        /// CEFR level
        #[arg(long)]
        level: Option<Level>,

        /// Fill the entry through the oracle first
        #[arg(long)]
        lookup: bool,
    },

    /// Delete a word by id
    Delete {
        #[arg(value_name = "ID")]
        id: u64,
    },
}

#[derive(Subcommand)]
pub enum SongsAction {
    /// List songs
    List,

    /// Add a song from a lyric file
    Add {
        /// Song title
        #[arg(value_name = "TITLE")]
        title: String,

        /// Lyric text file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Folder id (default: first folder)
        #[arg(long)]
        folder: Option<u64>,
    },
}

/// Which words a practice session or listing covers.
#[derive(clap::Args, Clone, Debug, Default)]
pub struct PoolArgs {
    /// Limit to one collection
    #[arg(long, conflicts_with = "section")]
    pub collection: Option<u64>,

    /// Limit to one section
    #[arg(long)]
    pub section: Option<u64>,

    /// Limit to one CEFR level
    #[arg(long)]
    pub level: Option<Level>,

    /// Limit to one mastery status
    #[arg(long)]
    pub status: Option<MasteryStatus>,
}

/// Translation oracle choice
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OracleChoice {
    /// No oracle - lookups are unavailable and popups stay untranslated
    #[default]
    None,
    /// OpenRouter chat completions (requires OPENROUTER_API_KEY)
    OpenRouter,
    /// Anthropic Claude API (requires ANTHROPIC_API_KEY)
    Anthropic,
    /// Canned answers for testing
    Mock,
}

impl std::str::FromStr for OracleChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(OracleChoice::None),
            "openrouter" | "openai" => Ok(OracleChoice::OpenRouter),
            "anthropic" | "claude" => Ok(OracleChoice::Anthropic),
            "mock" | "test" => Ok(OracleChoice::Mock),
            _ => Err(format!(
                "Unknown oracle: {}. Use: none, openrouter, anthropic, or mock.",
                s
            )),
        }
    }
}

impl std::fmt::Display for OracleChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OracleChoice::None => write!(f, "none"),
            OracleChoice::OpenRouter => write!(f, "openrouter"),
            OracleChoice::Anthropic => write!(f, "anthropic"),
            OracleChoice::Mock => write!(f, "mock"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_practice_with_filters() {
        let cli = Cli::try_parse_from([
            "vocabmaster",
            "-vv",
            "--oracle",
            "mock",
            "practice",
            "quiz",
            "--section",
            "2",
            "--level",
            "B1",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.oracle, OracleChoice::Mock);
        match cli.command {
            Commands::Practice { mode, pool } => {
                assert_eq!(mode, PracticeMode::Quiz);
                assert_eq!(pool.section, Some(2));
                assert_eq!(pool.level, Some(Level::B1));
            }
            _ => panic!("expected practice"),
        }
    }

    #[test]
    fn test_unknown_oracle_is_rejected() {
        assert!("ollama".parse::<OracleChoice>().is_err());
        assert_eq!("Claude".parse::<OracleChoice>().unwrap(), OracleChoice::Anthropic);
    }
}
