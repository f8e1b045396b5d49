//! Per-execution store of step outputs.

use std::collections::HashMap;

use crate::definition::Workflow;
use crate::result::StepStatus;

/// What a store key currently resolves to.
#[derive(Debug, PartialEq)]
pub enum Lookup<'a> {
    /// The producing step succeeded.
    Available(&'a serde_json::Value),
    /// The producing step exists but has no output: it was skipped, failed,
    /// or has not run (`status` is `None`).
    Unavailable {
        step_id: &'a str,
        status: Option<StepStatus>,
    },
    /// No step of the workflow stores under this key.
    Undeclared,
}

/// Outputs stored so far by one execution.
///
/// Owned by a single execution and never shared between executions.
#[derive(Debug, Default)]
pub struct ResultStore {
    /// store key -> producing step id
    producers: HashMap<String, String>,
    /// step id -> store key
    keys: HashMap<String, String>,
    statuses: HashMap<String, StepStatus>,
    outputs: HashMap<String, serde_json::Value>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store with every step's key of `workflow` declared.
    pub fn for_workflow(workflow: &Workflow) -> Self {
        let mut store = Self::new();
        for step in &workflow.steps {
            store.declare(step.store_key(), &step.id);
        }
        store
    }

    pub fn declare(&mut self, key: impl Into<String>, step_id: impl Into<String>) {
        let key = key.into();
        let step_id = step_id.into();
        self.keys.insert(step_id.clone(), key.clone());
        self.producers.insert(key, step_id);
    }

    pub fn is_declared(&self, key: &str) -> bool {
        self.producers.contains_key(key)
    }

    /// Record the terminal state of a step; `output` is kept only on success.
    pub fn record(&mut self, step_id: &str, status: StepStatus, output: Option<serde_json::Value>) {
        self.statuses.insert(step_id.to_string(), status);
        if status == StepStatus::Success {
            if let (Some(key), Some(value)) = (self.keys.get(step_id), output) {
                self.outputs.insert(key.clone(), value);
            }
        }
    }

    pub fn status(&self, step_id: &str) -> Option<StepStatus> {
        self.statuses.get(step_id).copied()
    }

    /// Resolve a store key.
    pub fn lookup(&self, key: &str) -> Lookup<'_> {
        let Some(step_id) = self.producers.get(key) else {
            return Lookup::Undeclared;
        };
        match self.outputs.get(key) {
            Some(value) => Lookup::Available(value),
            None => Lookup::Unavailable {
                step_id,
                status: self.status(step_id),
            },
        }
    }

    /// Output of the step with id `step_id`, if it succeeded.
    pub fn output_of(&self, step_id: &str) -> Option<&serde_json::Value> {
        self.keys.get(step_id).and_then(|key| self.outputs.get(key))
    }
}
