//! Configuration errors.

use std::path::PathBuf;

use thiserror::Error;

use crate::validator::ValidationError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Environment variable not set: ${{{0}}}")]
    EnvVarNotSet(String),

    #[error("Invalid environment pattern: {0}")]
    EnvPattern(#[from] regex::Error),

    /// Every error the validator reported, in check order.
    #[error("Invalid configuration: {}", summary(.0))]
    Invalid(Vec<ValidationError>),
}

fn summary(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
