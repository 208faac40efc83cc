//! CLI command implementations.

pub mod annotate;
pub mod import;
pub mod init;
pub mod practice;
pub mod songs;
pub mod status;
pub mod words;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use colored::Colorize;
use tracing::info;
use vocabmaster::{
    AnthropicOracle, Library, MockOracle, OpenRouterOracle, Scope, TranslationOracle, VocabMaster,
};

use crate::cli::{OracleChoice, PoolArgs};

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Global options every command needs.
pub struct Context {
    pub library_path: PathBuf,
    pub oracle: OracleChoice,
    pub model: Option<String>,
    pub verbose: u8,
}

impl Context {
    /// Load the library (or a fresh one) and attach the chosen oracle.
    pub fn open(&self) -> Result<VocabMaster, Box<dyn std::error::Error>> {
        let library = Library::load_or_default(&self.library_path)?;
        let mut vm = VocabMaster::with_library(library);
        if let Some(oracle) = self.build_oracle()? {
            info!(oracle = oracle.name(), model = %oracle.config().model, "oracle ready");
            vm = vm.with_shared_oracle(oracle);
        }
        Ok(vm)
    }

    /// Write the library back, keeping the previous file in history.
    pub fn save(&self, vm: &VocabMaster) -> CommandResult {
        vm.library().save_with_history(&self.library_path)?;
        Ok(())
    }

    fn build_oracle(&self) -> vocabmaster::Result<Option<Arc<dyn TranslationOracle>>> {
        let oracle: Arc<dyn TranslationOracle> = match self.oracle {
            OracleChoice::None => return Ok(None),
            OracleChoice::Mock => Arc::new(MockOracle::new()),
            OracleChoice::OpenRouter => {
                let oracle = OpenRouterOracle::from_env()?;
                match &self.model {
                    Some(model) => Arc::new(oracle.with_model(model)),
                    None => Arc::new(oracle),
                }
            }
            OracleChoice::Anthropic => {
                let oracle = AnthropicOracle::from_env()?;
                match &self.model {
                    Some(model) => Arc::new(oracle.with_model(model)),
                    None => Arc::new(oracle),
                }
            }
        };
        Ok(Some(oracle))
    }
}

impl PoolArgs {
    pub fn scope(&self) -> Scope {
        match (self.collection, self.section) {
            (Some(id), _) => Scope::Collection(id),
            (None, Some(id)) => Scope::Section(id),
            (None, None) => Scope::All,
        }
    }
}

/// Print a prompt and read one trimmed line. `None` on end of input.
pub fn prompt(label: &str) -> io::Result<Option<String>> {
    print!("{} ", label.dimmed());
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Ask a yes/no question; anything but `y`/`yes` is no.
pub fn confirm(label: &str) -> io::Result<bool> {
    Ok(prompt(label)?.is_some_and(|answer| {
        matches!(answer.to_lowercase().as_str(), "y" | "yes")
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_scope() {
        let args = PoolArgs {
            section: Some(3),
            ..PoolArgs::default()
        };
        assert_eq!(args.scope(), Scope::Section(3));
        assert_eq!(PoolArgs::default().scope(), Scope::All);
    }

    #[test]
    fn test_mock_oracle_needs_no_key() {
        let ctx = Context {
            library_path: PathBuf::from("unused.json"),
            oracle: OracleChoice::Mock,
            model: None,
            verbose: 0,
        };
        let oracle = ctx.build_oracle().unwrap().unwrap();
        assert_eq!(oracle.name(), "mock");
    }
}
