//! Structured logging initialization via `tracing`.
//!
//! Library crates only emit events; binaries and tests pick the output format here.
//! `RUST_LOG` always overrides the configured default level.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Output format for log lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable single-line output.
    #[default]
    Human,
    /// One JSON object per line, for log aggregation.
    Json,
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter: {0}")]
    InvalidFilter(String),
    #[error("global subscriber already installed: {0}")]
    AlreadyInitialized(String),
}

const FALLBACK_LEVEL: &str = "info";

fn filter(default_level: &str) -> Result<EnvFilter, LoggingError> {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    build_filter(env.as_deref(), default_level)
}

/// `RUST_LOG` directives when they parse, otherwise `default_level`.
fn build_filter(env: Option<&str>, default_level: &str) -> Result<EnvFilter, LoggingError> {
    if let Some(Ok(filter)) = env.map(EnvFilter::try_new) {
        return Ok(filter);
    }
    EnvFilter::try_new(default_level).map_err(|e| LoggingError::InvalidFilter(e.to_string()))
}

/// Install the global subscriber, failing if one is already installed.
pub fn try_init_logging(format: LogFormat, default_level: &str) -> Result<(), LoggingError> {
    let filter = filter(default_level)?;
    let registry = tracing_subscriber::registry().with(filter);
    let result = match format {
        LogFormat::Human => registry.with(fmt::layer().with_target(true)).try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_target(true))
            .try_init(),
    };
    result.map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))
}

/// Install the global subscriber. A second call is a no-op.
///
/// An unparsable `default_level` is reported on stderr and replaced by `info`.
pub fn init_logging(format: LogFormat, default_level: &str) {
    match try_init_logging(format, default_level) {
        Ok(()) | Err(LoggingError::AlreadyInitialized(_)) => {}
        Err(err @ LoggingError::InvalidFilter(_)) => {
            eprintln!("{err}; falling back to `{FALLBACK_LEVEL}`");
            if try_init_logging(format, FALLBACK_LEVEL).is_ok() {
                tracing::warn!(directive = default_level, "ignored invalid log filter");
            }
        }
    }
}
