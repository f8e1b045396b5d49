//! Engine errors.

use std::time::Duration;

use thinking_protocols::ToolError;
use thiserror::Error;

/// Registration and lookup errors.
///
/// These are returned directly to the caller; they never describe a failure
/// that happened while a workflow was running.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid workflow type '{0}': expected sequential, parallel or conditional")]
    InvalidType(String),

    #[error("Workflow already registered: {0}")]
    DuplicateWorkflow(String),

    #[error("Duplicate step id: {0}")]
    DuplicateStep(String),

    #[error("Store key '{key}' is used by both step '{first}' and step '{second}'")]
    DuplicateStoreKey {
        key: String,
        first: String,
        second: String,
    },

    #[error("Step '{step}' depends on unknown step '{dependency}'")]
    UnknownDependency { step: String, dependency: String },

    #[error("Condition of step '{step}' references unknown step '{source_step}'")]
    UnknownConditionSource { step: String, source_step: String },

    #[error("Step '{0}' depends on itself")]
    SelfDependency(String),

    #[error("Dependency cycle detected: {}", .steps.join(" -> "))]
    Cycle { steps: Vec<String> },

    #[error("Invalid condition on step '{step}': {message}")]
    InvalidCondition { step: String, message: String },

    #[error("Failed to load workflows from {path}: {message}")]
    Load { path: String, message: String },

    #[error("Workflow not found: {0}")]
    NotFound(String),

    #[error("Orchestrator is not initialized: no tool executor configured")]
    NotInitialized,
}

/// Why a single step failed.
///
/// Captured into [`StepResult::error`](crate::result::StepResult) rather than
/// propagated.
#[derive(Debug, Error)]
pub enum StepError {
    #[error("Input resolution failed: {0}")]
    Resolution(String),

    #[error("Condition evaluation failed: {0}")]
    Condition(String),

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("Output transform failed: {0}")]
    Transform(String),

    #[error("Step timed out after {0:?}")]
    Timeout(Duration),

    #[error("Step was cancelled")]
    Cancelled,

    #[error("Step task panicked: {0}")]
    Panicked(String),
}
