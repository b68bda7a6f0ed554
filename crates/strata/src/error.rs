//! Errors surfaced by the scenario runner.

use thiserror::Error;

use strata_core::{ConfigError, EngineError};

/// Anything that can stop a scenario.
#[derive(Error, Debug)]
pub enum ScenarioError {
    /// Reading the configuration file failed.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration document is malformed.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A configuration value is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),

    /// The storage engine rejected an operation.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl From<ConfigError> for ScenarioError {
    fn from(error: ConfigError) -> Self {
        match error {
            ConfigError::Parse(error) => Self::Parse(error),
            ConfigError::Invalid(message) => Self::Invalid(message),
        }
    }
}
