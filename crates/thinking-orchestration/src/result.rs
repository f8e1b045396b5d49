//! Execution results.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Terminal state of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Success,
    Failed,
    Skipped,
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        };
        f.write_str(s)
    }
}

/// Outcome of a workflow execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStatus {
    /// Every attempted step succeeded or was skipped.
    Success,
    /// At least one optional step failed.
    Partial,
    /// A required step failed, or the workflow could not run at all.
    Failed,
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Success => "success",
            Self::Partial => "partial",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Result of one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub step_id: String,
    pub tool: String,
    /// Value returned by the tool (after any transform). Null unless succeeded.
    pub result: serde_json::Value,
    pub status: StepStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub duration_ms: u64,
}

impl StepResult {
    pub fn success(
        step_id: impl Into<String>,
        tool: impl Into<String>,
        result: serde_json::Value,
    ) -> Self {
        Self {
            step_id: step_id.into(),
            tool: tool.into(),
            result,
            status: StepStatus::Success,
            error: None,
            duration_ms: 0,
        }
    }

    pub fn failure(
        step_id: impl Into<String>,
        tool: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            step_id: step_id.into(),
            tool: tool.into(),
            result: serde_json::Value::Null,
            status: StepStatus::Failed,
            error: Some(error.into()),
            duration_ms: 0,
        }
    }

    pub fn skipped(step_id: impl Into<String>, tool: impl Into<String>) -> Self {
        Self {
            step_id: step_id.into(),
            tool: tool.into(),
            result: serde_json::Value::Null,
            status: StepStatus::Skipped,
            error: None,
            duration_ms: 0,
        }
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }
}

/// Result of one `ExecuteWorkflow` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowResult {
    pub workflow_id: String,
    pub execution_id: String,
    pub status: WorkflowStatus,
    /// Step id to result, for every step that reached a terminal state.
    pub step_results: HashMap<String, StepResult>,
    /// Result of the last step (in execution order) that succeeded.
    pub final_output: serde_json::Value,
    /// Set iff `status` is failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub duration_ms: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl WorkflowResult {
    /// A failed result for an execution that never started a step.
    pub fn failed(workflow_id: impl Into<String>, error: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            workflow_id: workflow_id.into(),
            execution_id: uuid::Uuid::new_v4().to_string(),
            status: WorkflowStatus::Failed,
            step_results: HashMap::new(),
            final_output: serde_json::Value::Null,
            error: Some(error.into()),
            duration_ms: 0,
            started_at: now,
            finished_at: now,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == WorkflowStatus::Success
    }

    pub fn step(&self, step_id: &str) -> Option<&StepResult> {
        self.step_results.get(step_id)
    }
}
