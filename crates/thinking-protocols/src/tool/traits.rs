//! Tool trait definition.

use async_trait::async_trait;

use super::{ToolContext, ToolDefinition};
use crate::error::ToolError;

/// Core trait for tools.
///
/// A tool is a single reasoning operation (validation, decision-making,
/// causal analysis, ...) that can be invoked by name.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the tool definition.
    fn definition(&self) -> &ToolDefinition;

    /// Execute the tool with the given parameters.
    async fn execute(
        &self,
        params: serde_json::Value,
        ctx: ToolContext,
    ) -> Result<serde_json::Value, ToolError>;

    /// Validate the parameters before execution.
    fn validate(&self, params: &serde_json::Value) -> Result<(), ToolError> {
        let definition = self.definition();
        if let Some(schema) = &definition.parameters_schema {
            if schema.get("type") == Some(&serde_json::json!("object")) && !params.is_object() {
                return Err(ToolError::ValidationFailed(
                    "Parameters must be an object".to_string(),
                ));
            }
            if let Some(required) = schema.get("required").and_then(|r| r.as_array()) {
                for name in required.iter().filter_map(|n| n.as_str()) {
                    if params.get(name).is_none() {
                        return Err(ToolError::ValidationFailed(format!(
                            "Missing required parameter '{}'",
                            name
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockTool {
        definition: ToolDefinition,
    }

    impl MockTool {
        fn new() -> Self {
            Self {
                definition: ToolDefinition::new("mock_tool", "Mock Tool", "A mock tool for testing"),
            }
        }

        fn with_schema(schema: serde_json::Value) -> Self {
            Self {
                definition: ToolDefinition::new("mock_tool", "Mock Tool", "A mock tool")
                    .with_parameters_schema(schema),
            }
        }
    }

    #[async_trait]
    impl Tool for MockTool {
        fn definition(&self) -> &ToolDefinition {
            &self.definition
        }

        async fn execute(
            &self,
            params: serde_json::Value,
            _ctx: ToolContext,
        ) -> Result<serde_json::Value, ToolError> {
            Ok(serde_json::json!({ "echo": params }))
        }
    }

    #[test]
    fn test_validate_no_schema() {
        let tool = MockTool::new();
        assert!(tool.validate(&serde_json::json!("anything")).is_ok());
    }

    #[test]
    fn test_validate_object_schema_with_non_object() {
        let tool = MockTool::with_schema(serde_json::json!({"type": "object"}));
        match tool.validate(&serde_json::json!([1, 2, 3])) {
            Err(ToolError::ValidationFailed(msg)) => assert!(msg.contains("must be an object")),
            other => panic!("Expected ValidationFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_required_parameter() {
        let tool = MockTool::with_schema(serde_json::json!({
            "type": "object",
            "required": ["content"]
        }));
        assert!(tool.validate(&serde_json::json!({"content": "x"})).is_ok());

        let err = tool.validate(&serde_json::json!({})).unwrap_err();
        assert!(err.to_string().contains("content"));
    }

    #[tokio::test]
    async fn test_tool_execute() {
        let tool = MockTool::new();
        let result = tool
            .execute(serde_json::json!({"a": 1}), ToolContext::new())
            .await
            .unwrap();
        assert_eq!(result["echo"]["a"], 1);
    }
}
