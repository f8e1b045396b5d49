//! Tool execution context.

use tokio_util::sync::CancellationToken;

/// Context for a single tool invocation.
///
/// Carries the identity of the calling workflow step and the cancellation
/// signal of the surrounding execution.
#[derive(Debug, Clone)]
pub struct ToolContext {
    /// Correlation ID for tracing.
    pub correlation_id: String,

    /// Workflow the invocation belongs to, if any.
    pub workflow_id: Option<String>,

    /// Step the invocation belongs to, if any.
    pub step_id: Option<String>,

    /// Cancellation signal shared with the execution.
    pub cancellation: CancellationToken,
}

impl ToolContext {
    /// Create a standalone context with a fresh correlation ID.
    pub fn new() -> Self {
        Self {
            correlation_id: uuid::Uuid::new_v4().to_string(),
            workflow_id: None,
            step_id: None,
            cancellation: CancellationToken::new(),
        }
    }

    /// Create a context for a workflow step.
    pub fn for_step(
        correlation_id: impl Into<String>,
        workflow_id: impl Into<String>,
        step_id: impl Into<String>,
        cancellation: CancellationToken,
    ) -> Self {
        Self {
            correlation_id: correlation_id.into(),
            workflow_id: Some(workflow_id.into()),
            step_id: Some(step_id.into()),
            cancellation,
        }
    }

    /// Check whether the surrounding execution was cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}

impl Default for ToolContext {
    fn default() -> Self {
        Self::new()
    }
}
