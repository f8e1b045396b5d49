//! Step executor and result aggregation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::Value;
use tokio::sync::{Semaphore, broadcast};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use thinking_protocols::{ToolContext, ToolError, ToolExecutor, ToolInput};

use crate::condition::ConditionEvaluator;
use crate::definition::{Workflow, WorkflowStep};
use crate::error::{StepError, WorkflowError};
use crate::events::WorkflowEvent;
use crate::resolver::DependencyResolver;
use crate::result::{StepResult, StepStatus, WorkflowResult, WorkflowStatus};
use crate::store::ResultStore;
use crate::template::TemplateResolver;

/// Executor tuning.
#[derive(Debug, Clone)]
pub struct ExecutorOptions {
    /// Steps of one batch allowed to call tools at the same time.
    pub max_concurrent_steps: usize,
    /// Limit for a single tool call.
    pub step_timeout: Duration,
    /// Limit for a whole execution, checked before each batch.
    pub workflow_timeout: Option<Duration>,
    /// Capacity of the event channel.
    pub event_buffer: usize,
}

impl Default for ExecutorOptions {
    fn default() -> Self {
        Self {
            max_concurrent_steps: 8,
            step_timeout: Duration::from_secs(300),
            workflow_timeout: None,
            event_buffer: 256,
        }
    }
}

/// Runs workflows against a [`ToolExecutor`].
///
/// Batches run strictly one after another. Inside a batch the steps are
/// prepared in declaration order (condition, then input resolution) and the
/// ones that survive are dispatched as concurrent tasks, capped by
/// `max_concurrent_steps`. Outcomes are folded back in declaration order.
pub struct WorkflowExecutor {
    tool_executor: Arc<dyn ToolExecutor>,
    options: ExecutorOptions,
    events: broadcast::Sender<WorkflowEvent>,
}

/// State owned by one execution.
struct Execution {
    id: String,
    store: ResultStore,
    step_results: HashMap<String, StepResult>,
    final_output: Value,
    partial: bool,
    abort: Option<String>,
}

impl WorkflowExecutor {
    pub fn new(tool_executor: Arc<dyn ToolExecutor>) -> Self {
        Self::with_options(tool_executor, ExecutorOptions::default())
    }

    pub fn with_options(tool_executor: Arc<dyn ToolExecutor>, options: ExecutorOptions) -> Self {
        let (events, _) = broadcast::channel(options.event_buffer.max(1));
        Self {
            tool_executor,
            options,
            events,
        }
    }

    pub fn options(&self) -> &ExecutorOptions {
        &self.options
    }

    /// Receive progress events of every execution started after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<WorkflowEvent> {
        self.events.subscribe()
    }

    /// Execute `workflow` with `input` as its initial input.
    pub async fn execute(
        &self,
        workflow: &Workflow,
        input: ToolInput,
    ) -> Result<WorkflowResult, WorkflowError> {
        self.execute_with_cancel(workflow, input, CancellationToken::new())
            .await
    }

    /// Execute with an external cancellation signal.
    ///
    /// Only an unresolvable workflow is an `Err`; every execution-time failure
    /// is reported inside the returned [`WorkflowResult`].
    pub async fn execute_with_cancel(
        &self,
        workflow: &Workflow,
        input: ToolInput,
        cancel: CancellationToken,
    ) -> Result<WorkflowResult, WorkflowError> {
        let plan = DependencyResolver::plan(workflow)?;

        let started_at = Utc::now();
        let clock = Instant::now();
        let deadline = self.options.workflow_timeout.map(|limit| (clock + limit, limit));

        let mut run = Execution {
            id: uuid::Uuid::new_v4().to_string(),
            store: ResultStore::for_workflow(workflow),
            step_results: HashMap::new(),
            final_output: Value::Null,
            partial: false,
            abort: None,
        };

        info!(
            workflow = %workflow.id,
            execution = %run.id,
            batches = plan.len(),
            "Starting workflow execution"
        );
        self.emit(WorkflowEvent::Started {
            execution_id: run.id.clone(),
            workflow_id: workflow.id.clone(),
        });

        for (n, batch) in plan.iter().enumerate() {
            if cancel.is_cancelled() {
                run.abort = Some("Workflow execution was cancelled".to_string());
                break;
            }
            if let Some((at, limit)) = deadline {
                if Instant::now() >= at {
                    run.abort = Some(format!("Workflow timed out after {:?}", limit));
                    break;
                }
            }

            debug!(workflow = %workflow.id, batch = n, size = batch.len(), "Running batch");
            self.run_batch(workflow, batch, &input, &cancel, &mut run).await;
            if run.abort.is_some() {
                break;
            }
        }

        let status = if run.abort.is_some() {
            WorkflowStatus::Failed
        } else if run.partial {
            WorkflowStatus::Partial
        } else {
            WorkflowStatus::Success
        };
        let duration_ms = clock.elapsed().as_millis() as u64;

        match &run.abort {
            Some(error) => warn!(workflow = %workflow.id, execution = %run.id, %error, "Workflow failed"),
            None => info!(
                workflow = %workflow.id,
                execution = %run.id,
                %status,
                duration_ms,
                "Workflow finished"
            ),
        }
        self.emit(WorkflowEvent::Finished {
            execution_id: run.id.clone(),
            workflow_id: workflow.id.clone(),
            status,
            duration_ms,
        });

        Ok(WorkflowResult {
            workflow_id: workflow.id.clone(),
            execution_id: run.id,
            status,
            step_results: run.step_results,
            final_output: run.final_output,
            error: run.abort,
            duration_ms,
            started_at,
            finished_at: Utc::now(),
        })
    }

    async fn run_batch(
        &self,
        workflow: &Workflow,
        batch: &[usize],
        input: &ToolInput,
        cancel: &CancellationToken,
        run: &mut Execution,
    ) {
        let mut ready: Vec<(usize, ToolInput)> = Vec::with_capacity(batch.len());
        for &i in batch {
            let step = &workflow.steps[i];
            match ConditionEvaluator::evaluate(step.condition.as_ref(), &run.store) {
                Ok(true) => {}
                Ok(false) => {
                    debug!(workflow = %workflow.id, step = %step.id, "Condition not met, skipping");
                    self.finish(run, step, Ok(None), 0);
                    continue;
                }
                Err(e) => {
                    self.finish(run, step, Err(e), 0);
                    if run.abort.is_some() {
                        return;
                    }
                    continue;
                }
            }

            match TemplateResolver::resolve_step(step, input, &run.store) {
                Ok(concrete) => ready.push((i, concrete)),
                Err(e) => {
                    self.finish(run, step, Err(e), 0);
                    if run.abort.is_some() {
                        return;
                    }
                }
            }
        }

        let permits = Arc::new(Semaphore::new(self.options.max_concurrent_steps.max(1)));
        let mut handles = Vec::with_capacity(ready.len());
        for (i, concrete) in ready {
            let step = &workflow.steps[i];
            self.emit(WorkflowEvent::StepStarted {
                execution_id: run.id.clone(),
                step_id: step.id.clone(),
                tool: step.tool.clone(),
            });

            // Dispatched calls are never interrupted by the caller's token;
            // the step token only fires when the step times out.
            let step_cancel = CancellationToken::new();
            let ctx = ToolContext::for_step(&run.id, &workflow.id, &step.id, step_cancel.clone());
            let tools = self.tool_executor.clone();
            let tool = step.tool.clone();
            let timeout = self.options.step_timeout;
            let permits = permits.clone();
            let cancel = cancel.clone();

            let handle = tokio::spawn(async move {
                let _permit = tokio::select! {
                    permit = permits.acquire_owned() => permit.ok()?,
                    _ = cancel.cancelled() => return None,
                };
                let start = Instant::now();
                let outcome = match tokio::time::timeout(timeout, tools.execute_tool(ctx, &tool, concrete)).await {
                    Ok(Ok(value)) => Ok(value),
                    Ok(Err(ToolError::Cancelled)) => Err(StepError::Cancelled),
                    Ok(Err(e)) => Err(StepError::Tool(e)),
                    Err(_) => {
                        step_cancel.cancel();
                        Err(StepError::Timeout(timeout))
                    }
                };
                Some((outcome, start.elapsed().as_millis() as u64))
            });
            handles.push((i, handle));
        }

        let mut not_started = 0;
        for (i, handle) in handles {
            let step = &workflow.steps[i];
            let (outcome, duration_ms) = match handle.await {
                Ok(Some(done)) => done,
                Ok(None) => {
                    not_started += 1;
                    continue;
                }
                Err(e) => (Err(StepError::Panicked(e.to_string())), 0),
            };

            let outcome = outcome.and_then(|value| match &step.transform {
                Some(transform) => transform.apply(value),
                None => Ok(value),
            });
            self.finish(run, step, outcome.map(Some), duration_ms);
        }

        if not_started > 0 && run.abort.is_none() {
            run.abort = Some("Workflow execution was cancelled".to_string());
        }
    }

    /// Record a step's terminal state. `Ok(None)` means skipped.
    fn finish(
        &self,
        run: &mut Execution,
        step: &WorkflowStep,
        outcome: Result<Option<Value>, StepError>,
        duration_ms: u64,
    ) {
        let (result, output) = match outcome {
            Ok(Some(value)) => {
                debug!(step = %step.id, tool = %step.tool, duration_ms, "Step succeeded");
                run.final_output = value.clone();
                (
                    StepResult::success(&step.id, &step.tool, value.clone()),
                    Some(value),
                )
            }
            Ok(None) => (StepResult::skipped(&step.id, &step.tool), None),
            Err(e) => {
                warn!(step = %step.id, tool = %step.tool, optional = step.optional, error = %e, "Step failed");
                if step.optional {
                    run.partial = true;
                } else if run.abort.is_none() {
                    run.abort = Some(format!("Step '{}' failed: {}", step.id, e));
                }
                (StepResult::failure(&step.id, &step.tool, e.to_string()), None)
            }
        };

        let result = result.with_duration(duration_ms);
        let status: StepStatus = result.status;
        run.store.record(&step.id, status, output);
        self.emit(WorkflowEvent::StepFinished {
            execution_id: run.id.clone(),
            step_id: step.id.clone(),
            status,
            duration_ms,
        });
        run.step_results.insert(step.id.clone(), result);
    }

    fn emit(&self, event: WorkflowEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
