//! `validate` command: check workflow files without starting the server.

use std::path::PathBuf;

use thinking_orchestration::{DependencyResolver, Workflow, WorkflowError, WorkflowRegistry, load_workflows};

/// What happened to one workflow file.
#[derive(Debug)]
pub(crate) struct FileReport {
    pub path: PathBuf,
    pub outcome: Result<Vec<(String, Vec<Vec<String>>)>, WorkflowError>,
}

/// Register every workflow of every file into one scratch registry, so ids
/// clashing across files are reported too.
pub(crate) fn check(files: &[PathBuf]) -> Vec<FileReport> {
    let registry = WorkflowRegistry::new();
    files
        .iter()
        .map(|path| FileReport {
            path: path.clone(),
            outcome: load_workflows(path).and_then(|workflows| {
                workflows
                    .into_iter()
                    .map(|workflow| register(&registry, workflow))
                    .collect()
            }),
        })
        .collect()
}

fn register(
    registry: &WorkflowRegistry,
    workflow: Workflow,
) -> Result<(String, Vec<Vec<String>>), WorkflowError> {
    let workflow = registry.register(workflow)?;
    let batches = DependencyResolver::plan_ids(&workflow)?;
    Ok((workflow.id.clone(), batches))
}

pub(crate) fn run(files: &[PathBuf]) -> Result<(), Box<dyn std::error::Error>> {
    let reports = check(files);
    let mut failed = 0;

    for report in &reports {
        match &report.outcome {
            Ok(workflows) => {
                println!("{}: ok", report.path.display());
                for (id, batches) in workflows {
                    println!("  {}", id);
                    for (n, batch) in batches.iter().enumerate() {
                        println!("    batch {}: {}", n + 1, batch.join(", "));
                    }
                }
            }
            Err(e) => {
                failed += 1;
                println!("{}: {}", report.path.display(), e);
            }
        }
    }

    if failed > 0 {
        return Err(format!("{} of {} file(s) failed validation", failed, reports.len()).into());
    }
    Ok(())
}
