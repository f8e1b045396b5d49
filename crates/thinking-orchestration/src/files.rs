//! Loading workflow definitions from disk.
//!
//! A path may name a single `.json` / `.toml` file or a directory, in which
//! case every such file directly inside it is loaded in file-name order.
//! A file holds either one workflow, a list of workflows, or a document with
//! a `workflows` list.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::definition::Workflow;
use crate::error::WorkflowError;

#[derive(Deserialize)]
#[serde(untagged)]
enum Document {
    Many { workflows: Vec<Workflow> },
    List(Vec<Workflow>),
    One(Box<Workflow>),
}

impl Document {
    fn into_workflows(self) -> Vec<Workflow> {
        match self {
            Self::Many { workflows } | Self::List(workflows) => workflows,
            Self::One(workflow) => vec![*workflow],
        }
    }
}

/// Load every workflow found at `path`. Definitions are parsed only; they
/// are validated when registered.
pub fn load_workflows(path: &Path) -> Result<Vec<Workflow>, WorkflowError> {
    if path.is_dir() {
        let mut workflows = Vec::new();
        for file in workflow_files(path)? {
            workflows.extend(load_file(&file)?);
        }
        Ok(workflows)
    } else {
        load_file(path)
    }
}

fn workflow_files(dir: &Path) -> Result<Vec<PathBuf>, WorkflowError> {
    let entries = fs::read_dir(dir).map_err(|e| load_error(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| load_error(dir, e))?.path();
        if path.is_file() && format_of(&path).is_some() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[derive(Clone, Copy)]
enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> Option<Format> {
    match path.extension()?.to_str()? {
        "json" => Some(Format::Json),
        "toml" => Some(Format::Toml),
        _ => None,
    }
}

fn load_file(path: &Path) -> Result<Vec<Workflow>, WorkflowError> {
    let format = format_of(path)
        .ok_or_else(|| load_error(path, "expected a .json or .toml file"))?;
    let content = fs::read_to_string(path).map_err(|e| load_error(path, e))?;

    let document: Document = match format {
        Format::Json => serde_json::from_str(&content).map_err(|e| load_error(path, e))?,
        Format::Toml => toml::from_str(&content).map_err(|e| load_error(path, e))?,
    };
    let workflows = document.into_workflows();
    debug!(path = %path.display(), count = workflows.len(), "Loaded workflow file");
    Ok(workflows)
}

fn load_error(path: &Path, err: impl std::fmt::Display) -> WorkflowError {
    WorkflowError::Load {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}
