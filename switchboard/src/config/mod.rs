//! Configuration system for Switchboard.
//!
//! Supports loading configuration from multiple sources (files,
//! environment variables) with validation and defaults. Most deployments
//! only ever touch the thresholds: the fusion weights and recency tiers
//! are fixed policy, while escalation and weak-result cutoffs are
//! empirical and tunable.

mod builder;
mod loader;
mod models;
mod validation;

pub use builder::ConfigBuilder;
pub use loader::ConfigLoader;
pub use models::*;

/// Default configuration file names the loader will look for.
pub const DEFAULT_CONFIG_FILES: &[&str] = &[
    "switchboard.toml",
    "switchboard.yaml",
    "switchboard.yml",
    "switchboard.json",
    ".switchboard/config.toml",
    ".switchboard/config.yaml",
    ".switchboard/config.yml",
    ".switchboard/config.json",
];

/// Environment variable prefix for Switchboard configuration.
pub const ENV_PREFIX: &str = "SWITCHBOARD_";

/// Configuration error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Error occurred during file loading
    #[error("Failed to load configuration file: {0}")]
    FileLoadError(String),

    /// Error occurred during environment loading
    #[error("Failed to load environment variables: {0}")]
    EnvLoadError(String),

    /// Error occurred during validation
    #[error("Configuration validation error: {0}")]
    ValidationError(String),

    /// Error occurred during parsing
    #[error("Configuration parsing error: {0}")]
    ParseError(String),

    /// General error
    #[error("{0}")]
    Other(String),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
