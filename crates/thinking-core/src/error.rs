//! Registry errors.

use thinking_protocols::ToolError;
use thiserror::Error;

/// Errors raised by [`BaseRegistry`](crate::registry::base::BaseRegistry).
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Not registered: {0}")]
    NotFound(String),
}

impl From<RegistryError> for ToolError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::AlreadyRegistered(id) => ToolError::AlreadyRegistered(id),
            RegistryError::NotFound(id) => ToolError::NotFound(id),
        }
    }
}
