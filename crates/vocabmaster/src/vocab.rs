//! The `VocabMaster` facade: a library plus optional oracle.

use std::sync::Arc;

use fastrand::Rng;
use tracing::debug;

use crate::annotate::{AnnotationSession, CommitReport, Popup};
use crate::config::VocabConfig;
use crate::enrich::{self, FillReport, LookupMode, TranslationChoices};
use crate::error::{Result, VocabError};
use crate::model::{SectionId, SongId, WordDraft, WordId};
use crate::oracle::{FillField, TranslationOracle};
use crate::practice::{FlashcardSession, PoolSpec, QuizSession, RecallSession};
use crate::store::{
    import_drafts, parse_import, CatalogStore, ImportReport, Library, WordFilter, WordStore,
};

/// Entry point tying the word library, the engines, and the oracle together.
pub struct VocabMaster {
    config: VocabConfig,
    library: Library,
    oracle: Option<Arc<dyn TranslationOracle>>,
}

impl VocabMaster {
    /// A fresh, seeded library with default configuration.
    pub fn new() -> Self {
        Self::with_library(Library::new())
    }

    pub fn with_library(library: Library) -> Self {
        Self {
            config: VocabConfig::default(),
            library,
            oracle: None,
        }
    }

    pub fn with_config(mut self, config: VocabConfig) -> Self {
        self.config = config;
        self
    }

    /// Enable oracle-backed lookups.
    pub fn with_oracle(mut self, oracle: impl TranslationOracle + 'static) -> Self {
        self.oracle = Some(Arc::new(oracle));
        self
    }

    pub fn with_shared_oracle(mut self, oracle: Arc<dyn TranslationOracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    pub fn config(&self) -> &VocabConfig {
        &self.config
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn library_mut(&mut self) -> &mut Library {
        &mut self.library
    }

    pub fn into_library(self) -> Library {
        self.library
    }

    pub fn oracle(&self) -> Option<&dyn TranslationOracle> {
        self.oracle.as_deref()
    }

    fn require_oracle(&self) -> Result<&dyn TranslationOracle> {
        self.oracle()
            .ok_or_else(|| VocabError::Config("no translation oracle configured".to_string()))
    }

    // Practice

    pub fn start_flashcards(&self, spec: PoolSpec) -> Result<FlashcardSession> {
        FlashcardSession::start(&self.library, spec)
    }

    pub fn start_quiz(&self, spec: PoolSpec) -> Result<QuizSession> {
        QuizSession::start_with(&self.library, spec, self.config.quiz_option_count, Rng::new())
    }

    pub fn start_recall(&self, spec: PoolSpec) -> Result<RecallSession> {
        RecallSession::start(&self.library, spec)
    }

    // Annotation

    /// Open an annotation session for a stored song.
    pub fn annotate(&self, song_id: SongId) -> Result<AnnotationSession> {
        let song = self
            .library
            .get_song(song_id)
            .ok_or(VocabError::NotFound { kind: "song", id: song_id })?;
        Ok(AnnotationSession::for_song(&song, &self.library, self.config.clone())
            .with_default_section(self.library.default_section()))
    }

    /// Open an annotation session for text that is not stored as a song.
    pub fn annotate_text(&self, title: &str, text: &str) -> AnnotationSession {
        AnnotationSession::new(title, text, &self.library, self.config.clone())
            .with_default_section(self.library.default_section())
    }

    /// Select text in a session, translating through the oracle if one is set.
    pub fn select<'s>(&self, session: &'s mut AnnotationSession, raw: &str) -> Option<&'s Popup> {
        match self.oracle() {
            Some(oracle) => session.select_with(raw, oracle),
            None => {
                if let Some(request) = session.select(raw) {
                    debug!(text = %request.text, "no oracle configured");
                    session.cancel_lookup(&request.text, "no translation oracle configured");
                }
                session.popup()
            }
        }
    }

    pub fn commit(&mut self, session: &mut AnnotationSession) -> CommitReport {
        session.commit(&mut self.library)
    }

    pub fn explain<'s>(&self, session: &'s mut AnnotationSession) -> Result<&'s str> {
        session.explain(self.require_oracle()?)
    }

    // Words

    pub fn add_word(&mut self, draft: WordDraft) -> Result<WordId> {
        self.library.create_word(draft)
    }

    /// Look up a draft through the oracle and merge the answer.
    pub fn lookup_word(
        &self,
        draft: &mut WordDraft,
        mode: LookupMode,
        editing: Option<WordId>,
    ) -> Result<Option<TranslationChoices>> {
        let oracle = self.require_oracle()?;
        enrich::enrich_draft(&self.library, oracle, draft, mode, editing)
    }

    pub fn fill_missing(&mut self, field: FillField, filter: &WordFilter) -> Result<FillReport> {
        let oracle = self.oracle.clone().ok_or_else(|| {
            VocabError::Config("no translation oracle configured".to_string())
        })?;
        Ok(enrich::fill_missing(&mut self.library, oracle.as_ref(), field, filter))
    }

    pub fn translate_missing(&mut self, filter: &WordFilter) -> Result<FillReport> {
        let oracle = self.oracle.clone().ok_or_else(|| {
            VocabError::Config("no translation oracle configured".to_string())
        })?;
        Ok(enrich::translate_missing(&mut self.library, oracle.as_ref(), filter))
    }

    /// Import `word<TAB or =>gloss` lines into a section.
    pub fn import_text(&mut self, text: &str, section_id: SectionId) -> Result<ImportReport> {
        if !self.library.sections(None).iter().any(|s| s.id == section_id) {
            return Err(VocabError::NotFound { kind: "section", id: section_id });
        }
        let drafts = parse_import(text, section_id);
        Ok(import_drafts(&mut self.library, drafts))
    }
}

impl Default for VocabMaster {
    fn default() -> Self {
        Self::new()
    }
}
