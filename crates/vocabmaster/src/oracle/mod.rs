//! Translation oracle: the external, best-effort linguistic lookup service.
//!
//! The oracle is optional. Every workflow that consults it treats the answer
//! as advisory and keeps its previous values when a call fails or returns
//! content that cannot be parsed.
//!
//! # Supported Providers
//!
//! - **OpenRouter** - any OpenAI-compatible chat endpoint (requires `OPENROUTER_API_KEY`)
//! - **Anthropic** - Claude models via API (requires `ANTHROPIC_API_KEY`)
//! - **Mock** - canned answers for tests and offline use
//!
//! # Example
//!
//! ```no_run
//! use vocabmaster::{AnthropicOracle, TranslationOracle};
//!
//! let oracle = AnthropicOracle::from_env().unwrap();
//! let record = oracle.lookup("give up").unwrap();
//! println!("{:?}", record.primary_translation());
//! ```

mod anthropic;
mod mock;
mod openrouter;
mod prompts;
mod provider;
mod record;

pub use anthropic::AnthropicOracle;
pub use mock::{MockOracle, OracleCall};
pub use openrouter::{OpenRouterOracle, DEFAULT_MODEL as OPENROUTER_DEFAULT_MODEL};
pub use provider::{FillField, OracleConfig, TranslationOracle};
pub use record::{extract_json, parse_fill_field, LinguisticRecord, Meaning};
