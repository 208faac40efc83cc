//! Logging setup using `tracing-subscriber`.
//!
//! Log events go to stderr so they never mix with command output.
//! `RUST_LOG` overrides the level picked from `-v`.

use std::io;

use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Level for a `-v` count: none → warn, `-v` → info, `-vv` → debug, more → trace.
pub fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the global subscriber. Call once at startup.
pub fn init_logging(verbosity: u8) {
    let level = level_for(verbosity);
    let default = format!("vocabmaster={},warn", level.as_str().to_lowercase());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(verbosity >= 2)
        .without_time();

    // A subscriber may already be set when embedded in tests.
    let _ = tracing_subscriber::registry().with(filter).with(layer).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(level_for(0), Level::WARN);
        assert_eq!(level_for(1), Level::INFO);
        assert_eq!(level_for(2), Level::DEBUG);
        assert_eq!(level_for(5), Level::TRACE);
    }
}
