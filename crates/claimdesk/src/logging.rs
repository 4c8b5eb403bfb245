//! Process-wide logging setup.
//!
//! Library code logs through `log` macros and `tracing` spans. This module
//! installs a `tracing-subscriber` registry writing to stderr and bridges
//! `log` records into it via `tracing-log`.

use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVE: &str = "info";

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Invalid log filter '{directive}': {reason}")]
    InvalidFilter { directive: String, reason: String },

    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}

#[derive(Debug, Clone, Default)]
pub struct LoggingOptions {
    /// Filter directive such as `debug` or `claimdesk=trace`. When unset,
    /// `RUST_LOG` is consulted, then `info`.
    pub level: Option<String>,
    /// Emit one JSON object per line instead of human-readable text.
    pub json: bool,
}

pub(crate) fn build_filter(level: Option<&str>) -> Result<EnvFilter, LoggingError> {
    match level {
        Some(directive) => EnvFilter::try_new(directive).map_err(|e| LoggingError::InvalidFilter {
            directive: directive.to_string(),
            reason: e.to_string(),
        }),
        None => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))),
    }
}

pub fn init_logging(options: &LoggingOptions) -> Result<(), LoggingError> {
    let filter = build_filter(options.level.as_deref())?;

    tracing_log::LogTracer::init().map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;

    let result = if options.json {
        let subscriber = tracing_subscriber::registry().with(filter).with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr),
        );
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let subscriber = tracing_subscriber::registry().with(filter).with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        );
        tracing::subscriber::set_global_default(subscriber)
    };

    result.map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))
}
