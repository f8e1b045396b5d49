//! Orchestrator facade.
//!
//! Owns the workflow registry and, once a tool executor is supplied, the
//! workflow executor. Every entry point used by the HTTP layer lives here.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use thinking_protocols::{ToolExecutor, ToolInput};

use crate::definition::{Workflow, WorkflowSummary};
use crate::error::WorkflowError;
use crate::events::WorkflowEvent;
use crate::executor::{ExecutorOptions, WorkflowExecutor};
use crate::registry::WorkflowRegistry;
use crate::result::WorkflowResult;

/// Outcome of a registration request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegistrationResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Registered workflows, sorted by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowList {
    pub count: usize,
    pub workflows: Vec<WorkflowSummary>,
}

pub struct Orchestrator {
    registry: Arc<WorkflowRegistry>,
    executor: RwLock<Option<Arc<WorkflowExecutor>>>,
}

impl Orchestrator {
    /// An orchestrator that can register workflows but not run them yet.
    pub fn new(registry: Arc<WorkflowRegistry>) -> Self {
        Self {
            registry,
            executor: RwLock::new(None),
        }
    }

    pub fn with_executor(registry: Arc<WorkflowRegistry>, executor: WorkflowExecutor) -> Self {
        Self {
            registry,
            executor: RwLock::new(Some(Arc::new(executor))),
        }
    }

    /// Install or replace the tool executor. Executions already running keep
    /// the executor they started with.
    pub fn set_tool_executor(&self, tools: Arc<dyn ToolExecutor>, options: ExecutorOptions) {
        *self.executor.write() = Some(Arc::new(WorkflowExecutor::with_options(tools, options)));
        info!("Tool executor installed");
    }

    /// Whether a tool executor is installed.
    pub fn is_ready(&self) -> bool {
        self.executor.read().is_some()
    }

    pub fn registry(&self) -> &Arc<WorkflowRegistry> {
        &self.registry
    }

    pub fn register(&self, workflow: Workflow) -> Result<Arc<Workflow>, WorkflowError> {
        self.registry.register(workflow)
    }

    /// Register and fold the outcome into a response body.
    pub fn register_workflow(&self, workflow: Workflow) -> RegistrationResponse {
        match self.register(workflow) {
            Ok(_) => RegistrationResponse {
                success: true,
                error: None,
            },
            Err(e) => RegistrationResponse {
                success: false,
                error: Some(e.to_string()),
            },
        }
    }

    pub fn get_workflow(&self, id: &str) -> Result<Arc<Workflow>, WorkflowError> {
        self.registry.get(id)
    }

    pub fn list_workflows(&self) -> WorkflowList {
        let workflows = self.registry.list();
        WorkflowList {
            count: workflows.len(),
            workflows,
        }
    }

    /// Run a registered workflow. Failures of any kind come back as a
    /// `failed` result.
    pub async fn execute_workflow(&self, id: &str, input: ToolInput) -> WorkflowResult {
        self.execute_workflow_with_cancel(id, input, CancellationToken::new())
            .await
    }

    pub async fn execute_workflow_with_cancel(
        &self,
        id: &str,
        input: ToolInput,
        cancel: CancellationToken,
    ) -> WorkflowResult {
        let workflow = match self.registry.get(id) {
            Ok(workflow) => workflow,
            Err(e) => {
                warn!(workflow = %id, "Execution requested for unknown workflow");
                return WorkflowResult::failed(id, e.to_string());
            }
        };

        let executor = self.executor.read().clone();
        let Some(executor) = executor else {
            return WorkflowResult::failed(id, WorkflowError::NotInitialized.to_string());
        };

        match executor.execute_with_cancel(&workflow, input, cancel).await {
            Ok(result) => result,
            Err(e) => WorkflowResult::failed(id, e.to_string()),
        }
    }

    /// Progress events, once a tool executor is installed.
    pub fn subscribe(&self) -> Option<broadcast::Receiver<WorkflowEvent>> {
        self.executor.read().as_ref().map(|e| e.subscribe())
    }
}
