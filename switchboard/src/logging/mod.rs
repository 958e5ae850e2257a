//! Structured logging infrastructure for Switchboard.
//!
//! This module provides a configurable logging system based on the tracing
//! crate, supporting different output formats and optional non-blocking
//! file output. Initialization is idempotent: if a global subscriber is
//! already installed, `init` is a no-op rather than an error, so the
//! embedding application's own logging setup always wins.

use std::path::Path;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;

use crate::config::{LogFormat, LogLevel, LoggingConfig};

/// Error type for logging operations
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error in subscriber setup
    #[error("subscriber error: {0}")]
    Subscriber(String),
}

/// Result type for logging operations
pub type Result<T> = std::result::Result<T, LogError>;

/// Initialize the logging system with the given configuration.
///
/// Returns the non-blocking writer's guard when file output is configured;
/// the caller must hold it for the process lifetime or buffered log lines
/// are lost on drop.
pub fn init(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let level = match config.level {
        LogLevel::Trace => Level::TRACE,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Info => Level::INFO,
        LogLevel::Warn => Level::WARN,
        LogLevel::Error => Level::ERROR,
    };

    let result = match &config.file {
        Some(path) => init_with_file(level, config, path),
        None if config.stdout => init_stdout(level, config).map(|()| None),
        // Logging disabled entirely.
        None => return Ok(None),
    };

    // If a subscriber is already set, treat init as a no-op.
    match result {
        Err(LogError::Subscriber(ref message)) if message.contains("has already been set") => {
            Ok(None)
        }
        other => other,
    }
}

fn init_stdout(level: Level, config: &LoggingConfig) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true);

    let result = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };

    result.map_err(|e| LogError::Subscriber(e.to_string()))
}

fn init_with_file(level: Level, config: &LoggingConfig, path: &Path) -> Result<Option<WorkerGuard>> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true)
        .with_writer(writer)
        .with_ansi(false);

    let result = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };

    result
        .map(|()| Some(guard))
        .map_err(|e| LogError::Subscriber(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoggingConfig;

    #[test]
    fn repeated_init_is_not_an_error() {
        let config = LoggingConfig::default();
        // Whichever call installs the subscriber, the other must be a no-op.
        assert!(init(&config).is_ok());
        assert!(init(&config).is_ok());
    }

    #[test]
    fn file_init_creates_missing_directories() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = LoggingConfig {
            file: Some(dir.path().join("logs/switchboard.log")),
            stdout: false,
            ..LoggingConfig::default()
        };
        // May be a no-op if another test already installed a subscriber;
        // either way it must not fail.
        assert!(init(&config).is_ok());
    }
}
