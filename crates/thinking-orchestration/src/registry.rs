//! Workflow registry.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::definition::{ConditionOperator, Workflow, WorkflowSummary, WorkflowType};
use crate::error::WorkflowError;
use crate::resolver::DependencyResolver;

/// Registered workflows, immutable once accepted.
///
/// Readers never observe a workflow that has not been fully validated:
/// validation runs before the write lock is taken and insertion is a single
/// map operation.
pub struct WorkflowRegistry {
    workflows: RwLock<HashMap<String, Arc<Workflow>>>,
}

impl WorkflowRegistry {
    pub fn new() -> Self {
        Self {
            workflows: RwLock::new(HashMap::new()),
        }
    }

    /// Validate and register a workflow.
    ///
    /// Fails on any structural problem, on an invalid dependency graph, or if
    /// the id is already taken.
    pub fn register(&self, mut workflow: Workflow) -> Result<Arc<Workflow>, WorkflowError> {
        Self::validate(&workflow)?;
        workflow.created_at = Some(Utc::now());

        let mut workflows = self.workflows.write();
        if workflows.contains_key(&workflow.id) {
            return Err(WorkflowError::DuplicateWorkflow(workflow.id));
        }

        let workflow = Arc::new(workflow);
        workflows.insert(workflow.id.clone(), workflow.clone());
        info!(
            workflow = %workflow.id,
            kind = %workflow.workflow_type,
            steps = workflow.steps.len(),
            "Registered workflow"
        );
        Ok(workflow)
    }

    pub fn get(&self, id: &str) -> Result<Arc<Workflow>, WorkflowError> {
        self.workflows
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| WorkflowError::NotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.workflows.read().contains_key(id)
    }

    /// Summaries of every workflow, sorted by id.
    pub fn list(&self) -> Vec<WorkflowSummary> {
        let mut summaries: Vec<WorkflowSummary> =
            self.workflows.read().values().map(|w| w.summary()).collect();
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        summaries
    }

    pub fn len(&self) -> usize {
        self.workflows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.workflows.read().is_empty()
    }

    /// Structural and dependency validation, without registering.
    pub fn validate(workflow: &Workflow) -> Result<(), WorkflowError> {
        if workflow.id.trim().is_empty() {
            return Err(WorkflowError::MissingField("id".into()));
        }
        if workflow.name.trim().is_empty() {
            return Err(WorkflowError::MissingField("name".into()));
        }
        match &workflow.workflow_type {
            WorkflowType::Unknown(raw) if raw.trim().is_empty() => {
                return Err(WorkflowError::MissingField("type".into()));
            }
            WorkflowType::Unknown(raw) => return Err(WorkflowError::InvalidType(raw.clone())),
            _ => {}
        }
        if workflow.steps.is_empty() {
            return Err(WorkflowError::MissingField("steps".into()));
        }

        let mut ids: HashSet<&str> = HashSet::new();
        let mut keys: HashMap<&str, &str> = HashMap::new();
        for (i, step) in workflow.steps.iter().enumerate() {
            if step.id.trim().is_empty() {
                return Err(WorkflowError::MissingField(format!("steps[{}].id", i)));
            }
            if step.tool.trim().is_empty() {
                return Err(WorkflowError::MissingField(format!("steps[{}].tool", i)));
            }
            if !ids.insert(step.id.as_str()) {
                return Err(WorkflowError::DuplicateStep(step.id.clone()));
            }
            if let Some(first) = keys.insert(step.store_key(), step.id.as_str()) {
                return Err(WorkflowError::DuplicateStoreKey {
                    key: step.store_key().to_string(),
                    first: first.to_string(),
                    second: step.id.clone(),
                });
            }

            if let Some(condition) = &step.condition {
                let invalid = |message: String| WorkflowError::InvalidCondition {
                    step: step.id.clone(),
                    message,
                };
                if condition.source_step.trim().is_empty() {
                    return Err(invalid("source_step is required".into()));
                }
                if let ConditionOperator::Unknown(raw) = &condition.operator {
                    return Err(invalid(format!("unknown operator '{}'", raw)));
                }
                if condition.operator.is_numeric() && !condition.value.is_number() {
                    return Err(invalid(format!(
                        "operator '{}' needs a numeric value",
                        condition.operator
                    )));
                }
            }
        }

        let plan = DependencyResolver::plan(workflow)?;
        debug!(workflow = %workflow.id, batches = plan.len(), "Workflow validated");
        Ok(())
    }
}

impl Default for WorkflowRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
