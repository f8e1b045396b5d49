//! Tool execution errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Tool already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Tool execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Parameter validation failed: {0}")]
    ValidationFailed(String),

    #[error("Tool execution timed out after {0} seconds")]
    Timeout(u64),

    #[error("Tool execution was cancelled")]
    Cancelled,

    #[error("Remote tool error: {0}")]
    Remote(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_error_not_found() {
        let err = ToolError::NotFound("think".to_string());
        assert!(err.to_string().contains("Tool not found"));
        assert!(err.to_string().contains("think"));
    }

    #[test]
    fn test_tool_error_already_registered() {
        let err = ToolError::AlreadyRegistered("echo".to_string());
        assert_eq!(err.to_string(), "Tool already registered: echo");
    }

    #[test]
    fn test_tool_error_execution_failed() {
        let err = ToolError::ExecutionFailed("boom".to_string());
        assert!(err.to_string().contains("execution failed"));
    }

    #[test]
    fn test_tool_error_timeout() {
        let err = ToolError::Timeout(30);
        assert!(err.to_string().contains("timed out"));
        assert!(err.to_string().contains("30"));
    }

    #[test]
    fn test_tool_error_cancelled() {
        assert!(ToolError::Cancelled.to_string().contains("cancelled"));
    }

    #[test]
    fn test_tool_error_remote() {
        let err = ToolError::Remote("HTTP 502".to_string());
        assert!(err.to_string().contains("HTTP 502"));
    }
}
