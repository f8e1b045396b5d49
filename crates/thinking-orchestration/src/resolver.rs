//! Dependency resolution.
//!
//! Edges come from three places: `depends_on`, the `source_step` of a
//! condition, and every `key.field` reference in a step's input (an edge
//! from the step that stores under `key`, unless that is the step itself).

use std::collections::{BTreeSet, HashMap};

use crate::definition::{Workflow, WorkflowStep, WorkflowType};
use crate::error::WorkflowError;
use crate::template::{Reference, references};

/// Execution order as batches of step indices into `Workflow::steps`.
pub type Plan = Vec<Vec<usize>>;

/// Orders steps into dependency batches.
///
/// Batch *k* holds every step whose dependencies all lie in batches
/// `0..k`. Within a batch, steps keep their declaration order.
pub struct DependencyResolver;

impl DependencyResolver {
    /// Batches of step ids, maximally parallel.
    pub fn resolve(steps: &[WorkflowStep]) -> Result<Vec<Vec<String>>, WorkflowError> {
        let deps = Self::graph(steps)?;
        let plan = Self::batches(&deps, steps, false)?;
        Ok(Self::ids(&plan, steps))
    }

    /// The plan the executor follows for `workflow`.
    ///
    /// Sequential workflows get single-step batches: at each point the
    /// first declared step whose dependencies are met runs next.
    pub fn plan(workflow: &Workflow) -> Result<Plan, WorkflowError> {
        let deps = Self::graph(&workflow.steps)?;
        let sequential = workflow.workflow_type == WorkflowType::Sequential;
        Self::batches(&deps, &workflow.steps, sequential)
    }

    /// [`plan`](Self::plan) with step ids instead of indices.
    pub fn plan_ids(workflow: &Workflow) -> Result<Vec<Vec<String>>, WorkflowError> {
        let plan = Self::plan(workflow)?;
        Ok(Self::ids(&plan, &workflow.steps))
    }

    fn ids(plan: &Plan, steps: &[WorkflowStep]) -> Vec<Vec<String>> {
        plan.iter()
            .map(|batch| batch.iter().map(|&i| steps[i].id.clone()).collect())
            .collect()
    }

    /// `deps[i]` is the set of steps step `i` waits for.
    fn graph(steps: &[WorkflowStep]) -> Result<Vec<BTreeSet<usize>>, WorkflowError> {
        let mut by_id: HashMap<&str, usize> = HashMap::with_capacity(steps.len());
        let mut by_key: HashMap<&str, usize> = HashMap::with_capacity(steps.len());
        for (i, step) in steps.iter().enumerate() {
            if by_id.insert(step.id.as_str(), i).is_some() {
                return Err(WorkflowError::DuplicateStep(step.id.clone()));
            }
            by_key.insert(step.store_key(), i);
        }

        let mut deps = vec![BTreeSet::new(); steps.len()];
        for (i, step) in steps.iter().enumerate() {
            for dependency in &step.depends_on {
                if dependency == &step.id {
                    return Err(WorkflowError::SelfDependency(step.id.clone()));
                }
                let j = by_id.get(dependency.as_str()).ok_or_else(|| {
                    WorkflowError::UnknownDependency {
                        step: step.id.clone(),
                        dependency: dependency.clone(),
                    }
                })?;
                deps[i].insert(*j);
            }

            if let Some(condition) = &step.condition {
                if condition.source_step == step.id {
                    return Err(WorkflowError::SelfDependency(step.id.clone()));
                }
                let j = by_id.get(condition.source_step.as_str()).ok_or_else(|| {
                    WorkflowError::UnknownConditionSource {
                        step: step.id.clone(),
                        source_step: condition.source_step.clone(),
                    }
                })?;
                deps[i].insert(*j);
            }

            // A step's own key is literal text in its input.
            let own = step.store_key();
            let is_key = |key: &str| key != own && by_key.contains_key(key);
            for reference in references(&step.input, &is_key) {
                if let Reference::Output { key, .. } = reference {
                    if let Some(&j) = by_key.get(key) {
                        deps[i].insert(j);
                    }
                }
            }
        }

        Ok(deps)
    }

    fn batches(
        deps: &[BTreeSet<usize>],
        steps: &[WorkflowStep],
        sequential: bool,
    ) -> Result<Plan, WorkflowError> {
        let n = deps.len();
        let mut dependents = vec![Vec::new(); n];
        for (i, ds) in deps.iter().enumerate() {
            for &d in ds {
                dependents[d].push(i);
            }
        }

        let mut waiting: Vec<usize> = deps.iter().map(BTreeSet::len).collect();
        let mut done = vec![false; n];
        let mut completed = 0;
        let mut plan = Vec::new();

        while completed < n {
            let ready = (0..n).filter(|&i| !done[i] && waiting[i] == 0);
            let batch: Vec<usize> = if sequential {
                ready.take(1).collect()
            } else {
                ready.collect()
            };

            if batch.is_empty() {
                return Err(Self::cycle(deps, &done, steps));
            }

            for &i in &batch {
                done[i] = true;
                for &dependent in &dependents[i] {
                    waiting[dependent] -= 1;
                }
            }
            completed += batch.len();
            plan.push(batch);
        }

        Ok(plan)
    }

    /// Name one cycle among the steps that could not be scheduled.
    ///
    /// Every unscheduled step waits on at least one other unscheduled step,
    /// so following those edges must revisit a step.
    fn cycle(deps: &[BTreeSet<usize>], done: &[bool], steps: &[WorkflowStep]) -> WorkflowError {
        let mut seen: HashMap<usize, usize> = HashMap::new();
        let mut path: Vec<usize> = Vec::new();
        let mut current = (0..done.len()).find(|&i| !done[i]);

        while let Some(i) = current {
            if let Some(&pos) = seen.get(&i) {
                let mut cycle: Vec<String> =
                    path[pos..].iter().map(|&j| steps[j].id.clone()).collect();
                cycle.push(steps[i].id.clone());
                return WorkflowError::Cycle { steps: cycle };
            }
            seen.insert(i, path.len());
            path.push(i);
            current = deps[i].iter().copied().find(|&d| !done[d]);
        }

        WorkflowError::Cycle {
            steps: path.iter().map(|&j| steps[j].id.clone()).collect(),
        }
    }
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
