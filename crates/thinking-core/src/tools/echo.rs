//! `echo` tool: returns its input unchanged.

use async_trait::async_trait;

use thinking_protocols::{Tool, ToolContext, ToolDefinition, ToolError};

/// Returns the parameters object it was called with.
///
/// Useful for smoke-testing workflows and for threading initial input into
/// a stored result.
pub struct EchoTool {
    definition: ToolDefinition,
}

impl EchoTool {
    pub fn new() -> Self {
        let definition = ToolDefinition::new("echo", "Echo", "Return the input unchanged")
            .with_parameters_schema(serde_json::json!({
                "type": "object",
                "additionalProperties": true
            }));
        Self { definition }
    }
}

impl Default for EchoTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for EchoTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        _ctx: ToolContext,
    ) -> Result<serde_json::Value, ToolError> {
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_echo_definition() {
        let tool = EchoTool::default();
        assert_eq!(tool.definition().id, "echo");
        assert!(tool.validate(&json!("not an object")).is_err());
    }

    #[tokio::test]
    async fn test_echo_returns_input() {
        let tool = EchoTool::new();
        let params = json!({"content": "X", "nested": {"n": 1}});
        let out = tool.execute(params.clone(), ToolContext::new()).await.unwrap();
        assert_eq!(out, params);
    }
}
