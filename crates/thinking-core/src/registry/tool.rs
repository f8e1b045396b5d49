//! Tool registry.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use thinking_protocols::{Tool, ToolContext, ToolDefinition, ToolError, ToolExecutor, ToolInput};

use super::base::{BaseRegistry, Registerable};

impl Registerable for dyn Tool {
    fn registry_id(&self) -> &str {
        &self.definition().id
    }
}

/// Registry of tools, addressed by [`ToolDefinition::id`].
///
/// This is the [`ToolExecutor`] the server injects into the workflow engine:
/// a step's `tool` name is looked up here, its input validated, and the tool
/// executed.
pub struct ToolRegistry {
    inner: BaseRegistry<dyn Tool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            inner: BaseRegistry::new(),
        }
    }

    /// Register a tool.
    pub fn register(&self, tool: Arc<dyn Tool>) -> Result<(), ToolError> {
        let id = tool.definition().id.clone();
        self.inner.register(tool)?;
        debug!(tool = %id, "Registered tool");
        Ok(())
    }

    /// Unregister a tool.
    pub fn unregister(&self, id: &str) -> Result<(), ToolError> {
        self.inner.unregister(id)?;
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn Tool>> {
        self.inner.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.inner.contains(id)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// All tool definitions, sorted by id.
    pub fn list(&self) -> Vec<ToolDefinition> {
        let mut defs: Vec<ToolDefinition> =
            self.inner.iter().map(|t| t.definition().clone()).collect();
        defs.sort_by(|a, b| a.id.cmp(&b.id));
        defs
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolExecutor for ToolRegistry {
    async fn execute_tool(
        &self,
        ctx: ToolContext,
        tool: &str,
        input: ToolInput,
    ) -> Result<serde_json::Value, ToolError> {
        let handler = self
            .get(tool)
            .ok_or_else(|| ToolError::NotFound(tool.to_string()))?;

        let params = serde_json::Value::Object(input);
        handler.validate(&params)?;

        if ctx.is_cancelled() {
            return Err(ToolError::Cancelled);
        }

        debug!(
            tool = %tool,
            correlation_id = %ctx.correlation_id,
            step = ctx.step_id.as_deref().unwrap_or("-"),
            "Executing tool"
        );
        handler.execute(params, ctx).await
    }
}
