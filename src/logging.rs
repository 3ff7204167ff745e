//! Tracing subscriber setup.
//!
//! The CLI logs to stderr. The TUI owns the terminal, so it logs to a file
//! in the data directory instead. The filter comes from `SMARTDO_LOG` when
//! set, otherwise from the `--log-level` flag or `[log] level`.

use std::path::Path;

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "SMARTDO_LOG";

/// Error type for logging setup
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },
    #[error("could not create log directory: {0}")]
    IoError(#[from] std::io::Error),
    #[error("logging already initialized")]
    AlreadyInitialized,
}

fn build_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    let directive = std::env::var(LOG_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| level.to_string());
    EnvFilter::try_new(&directive).map_err(|e| LoggingError::InvalidFilter {
        filter: directive,
        reason: e.to_string(),
    })
}

/// Log to stderr (CLI commands)
pub fn init_stderr(level: &str) -> Result<(), LoggingError> {
    let filter = build_filter(level)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init()
        .map_err(|_| LoggingError::AlreadyInitialized)
}

/// Log to `<data_dir>/<file>` (TUI)
pub fn init_file(level: &str, data_dir: &Path, file: &str) -> Result<(), LoggingError> {
    let filter = build_filter(level)?;
    std::fs::create_dir_all(data_dir)?;
    let appender = tracing_appender::rolling::never(data_dir, file);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(appender)
        .with_ansi(false)
        .try_init()
        .map_err(|_| LoggingError::AlreadyInitialized)
}
