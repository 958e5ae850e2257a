//! Configuration validation utilities.

use super::ConfigError;
use super::models::*;

/// Validate the entire configuration.
pub fn validate_config(config: &SwitchboardConfig) -> Result<(), ConfigError> {
    config
        .search
        .validate()
        .map_err(ConfigError::ValidationError)?;

    config
        .classifier
        .validate()
        .map_err(ConfigError::ValidationError)?;

    config
        .tools
        .validate()
        .map_err(ConfigError::ValidationError)?;

    Ok(())
}
