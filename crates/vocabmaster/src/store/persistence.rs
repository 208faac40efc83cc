//! Library file on disk.
//!
//! The whole library is one pretty-printed JSON document. Writes go to a
//! sibling `.tmp` file first and are renamed into place, so an interrupted
//! save never truncates the learner's vocabulary. Loading re-derives every
//! mastery status from its passed modes, which repairs hand-edited files.

use std::fmt::Display;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::{Result, VocabError};

use super::library::{Library, LIBRARY_FORMAT_VERSION};

/// Previous versions kept next to the library file.
pub const HISTORY_LIMIT: usize = 20;

fn persistence_error(action: &str, path: &Path, err: impl Display) -> VocabError {
    VocabError::Persistence(format!("Failed to {} '{}': {}", action, path.display(), err))
}

/// Major component of a `major.minor.patch` version string.
fn major(version: &str) -> &str {
    version.split('.').next().unwrap_or(version)
}

impl Library {
    /// Save the library to a JSON file, creating parent directories.
    ///
    /// ```no_run
    /// # use vocabmaster::Library;
    /// # fn example(library: &Library) -> vocabmaster::Result<()> {
    /// library.save("vocabmaster.json")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .map_err(|e| persistence_error("create directory", parent, e))?;
            }
        }

        let tmp = temp_path(path);
        let file = File::create(&tmp).map_err(|e| persistence_error("create file", &tmp, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer
            .flush()
            .map_err(|e| persistence_error("write file", &tmp, e))?;
        drop(writer);

        fs::rename(&tmp, path).map_err(|e| persistence_error("replace file", path, e))?;

        debug!(path = %path.display(), words = self.word_count(), "saved library");
        Ok(())
    }

    /// Load a library from a JSON file.
    ///
    /// Files written by an incompatible major format version are rejected.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| persistence_error("open file", path, e))?;
        let mut library: Library = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| persistence_error("parse library", path, e))?;

        if major(&library.format_version) != major(LIBRARY_FORMAT_VERSION) {
            return Err(VocabError::Persistence(format!(
                "'{}' uses format {}, this build reads {}",
                path.display(),
                library.format_version,
                LIBRARY_FORMAT_VERSION
            )));
        }

        let repaired = library.rederive_statuses();
        if repaired > 0 {
            warn!(path = %path.display(), repaired, "stored statuses disagreed with passed modes");
        }

        debug!(path = %path.display(), words = library.word_count(), "loaded library");
        Ok(library)
    }

    /// Load a library, or start a seeded one if the file does not exist yet.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            info!(path = %path.display(), "no library file, starting fresh");
            Ok(Self::new())
        }
    }

    /// Save, first copying the file being replaced into `<stem>.history/`.
    ///
    /// Only the newest [`HISTORY_LIMIT`] copies are kept.
    pub fn save_with_history(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if path.exists() {
            archive(path)?;
        }
        self.save(path)
    }

    /// Previous versions, newest first.
    pub fn list_history(path: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let history_dir = history_directory(path.as_ref());
        if !history_dir.exists() {
            return Ok(Vec::new());
        }

        let mut entries: Vec<PathBuf> = fs::read_dir(&history_dir)
            .map_err(|e| persistence_error("read history directory", &history_dir, e))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();

        // Names are timestamps, so lexical order is chronological.
        entries.sort_by(|a, b| b.cmp(a));
        Ok(entries)
    }
}

fn archive(path: &Path) -> Result<()> {
    let history_dir = history_directory(path);
    fs::create_dir_all(&history_dir)
        .map_err(|e| persistence_error("create history directory", &history_dir, e))?;

    let stamp = Utc::now().format("%Y-%m-%dT%H-%M-%S%.3f");
    let target = history_dir.join(format!("{}.json", stamp));
    fs::copy(path, &target).map_err(|e| persistence_error("archive", path, e))?;
    debug!(to = %target.display(), "archived previous library");

    for old in Library::list_history(path)?.into_iter().skip(HISTORY_LIMIT) {
        if let Err(e) = fs::remove_file(&old) {
            warn!(path = %old.display(), error = %e, "could not prune history");
        }
    }
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// History directory for a library file: `data/vocab.json` → `data/vocab.history`.
pub fn history_directory(path: &Path) -> PathBuf {
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    let parent = path.parent().unwrap_or(Path::new("."));
    parent.join(format!("{}.history", stem))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MasteryStatus, WordDraft};
    use crate::store::WordStore;
    use tempfile::TempDir;

    #[test]
    fn test_history_directory() {
        let path = Path::new("data/vocabmaster.json");
        assert_eq!(
            history_directory(path).to_string_lossy(),
            "data/vocabmaster.history"
        );
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vocab.json");
        Library::new().save(&path).unwrap();
        assert!(path.exists());
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn test_load_rejects_newer_major_version() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vocab.json");
        let mut library = Library::new();
        library.format_version = "2.0.0".to_string();
        library.save(&path).unwrap();

        let err = Library::load(&path).unwrap_err();
        assert!(err.to_string().contains("2.0.0"));
    }

    #[test]
    fn test_load_rederives_status() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vocab.json");
        let mut library = Library::new();
        let section = library.default_section().unwrap();
        let id = library.create_word(WordDraft::new(section, "apple")).unwrap();
        library.save(&path).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        fs::write(&path, raw.replace("\"status\": \"new\"", "\"status\": \"learned\"")).unwrap();

        let loaded = Library::load(&path).unwrap();
        assert_eq!(loaded.get_word(id).unwrap().status, MasteryStatus::New);
    }

    #[test]
    fn test_history_is_pruned() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vocab.json");
        let library = Library::new();
        library.save(&path).unwrap();

        let history_dir = history_directory(&path);
        fs::create_dir_all(&history_dir).unwrap();
        for i in 0..HISTORY_LIMIT + 3 {
            fs::write(history_dir.join(format!("2000-01-01T00-00-{:02}.000.json", i)), "{}").unwrap();
        }

        library.save_with_history(&path).unwrap();
        let history = Library::list_history(&path).unwrap();
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert!(!history_dir.join("2000-01-01T00-00-00.000.json").exists());
    }
}
