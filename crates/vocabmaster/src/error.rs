//! Error types for the VocabMaster library.

use thiserror::Error;

/// Main error type for VocabMaster operations.
#[derive(Debug, Error)]
pub enum VocabError {
    /// A headword already exists in the vocabulary (case-insensitive).
    #[error("\"{headword}\" already exists in: {location}")]
    Duplicate { headword: String, location: String },

    /// A candidate is already waiting in the pending-selection list.
    #[error("\"{0}\" already in selection list")]
    AlreadySelected(String),

    /// A quiz needs more words than the filtered pool holds.
    #[error("Need {required}+ words for this mode, only {available} available")]
    InsufficientPool { required: usize, available: usize },

    /// The filtered pool holds no words.
    #[error("No words match the current filters")]
    EmptyPool,

    /// An entity lookup by identifier failed.
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: u64 },

    /// The operation is not valid in the current session state.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Input rejected before reaching the store or oracle.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Transport or API failure talking to the oracle.
    #[error("Oracle error: {0}")]
    Oracle(String),

    /// The oracle answered with content that could not be parsed.
    #[error("Oracle response could not be parsed: {0}")]
    OracleParse(String),

    /// Error reading or writing the library file.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regex compilation error.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl VocabError {
    /// Whether this error is the duplicate-headword condition.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, VocabError::Duplicate { .. })
    }
}

/// Result type alias for VocabMaster operations.
pub type Result<T> = std::result::Result<T, VocabError>;
