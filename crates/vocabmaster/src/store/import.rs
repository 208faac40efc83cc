//! Bulk import of pasted `word<TAB>gloss` lines.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::{info, warn};

use crate::model::{SectionId, WordClass, WordDraft, WordId};

use super::WordStore;

static FIELD_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\t|=").expect("valid regex"));

/// Outcome of importing a batch of drafts.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    pub created: Vec<WordId>,
    /// Headwords skipped because they already exist.
    pub duplicates: Vec<String>,
    /// Headwords the store refused for another reason, with the message.
    pub failed: Vec<(String, String)>,
}

/// Parse pasted text into drafts for one section.
///
/// Each non-blank line is split on tabs or `=`:
/// - `word<sep>gloss` sets the English gloss;
/// - `word<sep>translation<sep>gloss` sets both.
///
/// Lines with a single field are skipped.
pub fn parse_import(text: &str, section_id: SectionId) -> Vec<WordDraft> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let parts: Vec<&str> = FIELD_SEPARATOR.split(line).map(str::trim).collect();
            if parts.len() < 2 || parts[0].is_empty() {
                return None;
            }
            let (translation, gloss) = if parts.len() == 3 {
                (parts[1], parts[2])
            } else {
                ("", parts[1])
            };
            Some(
                WordDraft::new(section_id, parts[0])
                    .with_class(WordClass::Phrase)
                    .with_translation(translation)
                    .with_gloss(gloss),
            )
        })
        .collect()
}

/// Create every draft, skipping duplicates instead of aborting the batch.
pub fn import_drafts(store: &mut dyn WordStore, drafts: Vec<WordDraft>) -> ImportReport {
    let mut report = ImportReport::default();
    for draft in drafts {
        let headword = draft.headword.trim().to_string();
        match store.create_word(draft) {
            Ok(id) => report.created.push(id),
            Err(e) if e.is_duplicate() => report.duplicates.push(headword),
            Err(e) => {
                warn!(headword = %headword, error = %e, "import failed");
                report.failed.push((headword, e.to_string()));
            }
        }
    }
    info!(
        created = report.created.len(),
        duplicates = report.duplicates.len(),
        "import finished"
    );
    report
}
