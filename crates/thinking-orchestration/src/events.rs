//! Progress events published during execution.

use serde::Serialize;

use crate::result::{StepStatus, WorkflowStatus};

/// Progress of a running workflow.
///
/// Published on a broadcast channel; with no subscribers the events are
/// dropped, and a lagging subscriber loses old events rather than slowing
/// execution down.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WorkflowEvent {
    Started {
        execution_id: String,
        workflow_id: String,
    },
    StepStarted {
        execution_id: String,
        step_id: String,
        tool: String,
    },
    StepFinished {
        execution_id: String,
        step_id: String,
        status: StepStatus,
        duration_ms: u64,
    },
    Finished {
        execution_id: String,
        workflow_id: String,
        status: WorkflowStatus,
        duration_ms: u64,
    },
}

impl WorkflowEvent {
    pub fn execution_id(&self) -> &str {
        match self {
            Self::Started { execution_id, .. }
            | Self::StepStarted { execution_id, .. }
            | Self::StepFinished { execution_id, .. }
            | Self::Finished { execution_id, .. } => execution_id,
        }
    }
}
