//! The tool-execution capability consumed by the workflow engine.

use async_trait::async_trait;

use super::ToolContext;
use crate::error::ToolError;
use crate::types::ToolInput;

/// Executes a named tool with a set of named inputs.
///
/// The workflow engine knows nothing about which tool names are valid or what
/// their results look like; the embedding application decides both by
/// supplying an implementation of this trait.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Run `tool` with `input` and return its (opaque) result.
    async fn execute_tool(
        &self,
        ctx: ToolContext,
        tool: &str,
        input: ToolInput,
    ) -> Result<serde_json::Value, ToolError>;
}
