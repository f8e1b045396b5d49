//! Scriptable tool executor for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use thinking_protocols::{ToolContext, ToolError, ToolExecutor, ToolInput};

/// A recorded invocation.
#[derive(Debug, Clone)]
pub struct ToolCall {
    pub tool: String,
    pub input: ToolInput,
    pub step_id: Option<String>,
}

#[derive(Debug, Clone)]
enum Scripted {
    Value(serde_json::Value),
    Failure(String),
}

/// Tool executor that returns pre-configured responses.
///
/// Unconfigured tools answer `{"tool": <name>, "input": <input>}`.
pub struct MockToolExecutor {
    responses: RwLock<HashMap<String, Scripted>>,
    delays: RwLock<HashMap<String, Duration>>,
    calls: Mutex<Vec<ToolCall>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockToolExecutor {
    pub fn new() -> Self {
        Self {
            responses: RwLock::new(HashMap::new()),
            delays: RwLock::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub async fn set_response(&self, tool: &str, response: serde_json::Value) {
        self.responses
            .write()
            .await
            .insert(tool.to_string(), Scripted::Value(response));
    }

    pub async fn set_failure(&self, tool: &str, message: &str) {
        self.responses
            .write()
            .await
            .insert(tool.to_string(), Scripted::Failure(message.to_string()));
    }

    pub async fn set_delay(&self, tool: &str, delay: Duration) {
        self.delays.write().await.insert(tool.to_string(), delay);
    }

    pub async fn calls(&self) -> Vec<ToolCall> {
        self.calls.lock().await.clone()
    }

    pub async fn call_count(&self, tool: &str) -> usize {
        self.calls.lock().await.iter().filter(|c| c.tool == tool).count()
    }

    /// Highest number of calls that were running at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Default for MockToolExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolExecutor for MockToolExecutor {
    async fn execute_tool(
        &self,
        ctx: ToolContext,
        tool: &str,
        input: ToolInput,
    ) -> Result<serde_json::Value, ToolError> {
        self.calls.lock().await.push(ToolCall {
            tool: tool.to_string(),
            input: input.clone(),
            step_id: ctx.step_id.clone(),
        });

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = self.delays.read().await.get(tool).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.responses.read().await.get(tool) {
            Some(Scripted::Value(value)) => Ok(value.clone()),
            Some(Scripted::Failure(message)) => Err(ToolError::ExecutionFailed(message.clone())),
            None => Ok(serde_json::json!({
                "tool": tool,
                "input": input,
            })),
        }
    }
}
