//! Workflow definitions.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thinking_protocols::{Metadata, ToolInput};

/// How the steps of a workflow are scheduled.
///
/// Parsed leniently from a string so that an unrecognized kind reaches
/// registration, where it is rejected with a descriptive error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WorkflowType {
    /// One step at a time, in declaration order.
    Sequential,
    /// Every step of a dependency batch runs concurrently.
    Parallel,
    /// Like `Parallel`, with per-step conditions deciding what runs.
    Conditional,
    /// Anything else (including a missing type).
    Unknown(String),
}

impl WorkflowType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Sequential => "sequential",
            Self::Parallel => "parallel",
            Self::Conditional => "conditional",
            Self::Unknown(raw) => raw,
        }
    }
}

impl Default for WorkflowType {
    fn default() -> Self {
        Self::Unknown(String::new())
    }
}

impl From<String> for WorkflowType {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "sequential" => Self::Sequential,
            "parallel" => Self::Parallel,
            "conditional" => Self::Conditional,
            _ => Self::Unknown(raw),
        }
    }
}

impl From<WorkflowType> for String {
    fn from(kind: WorkflowType) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for WorkflowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison applied by a [`StepCondition`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConditionOperator {
    Gt,
    Gte,
    Lt,
    Lte,
    Eq,
    Ne,
    Contains,
    Unknown(String),
}

impl ConditionOperator {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Contains => "contains",
            Self::Unknown(raw) => raw,
        }
    }

    /// Operators that order numbers.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Gt | Self::Gte | Self::Lt | Self::Lte)
    }
}

impl From<String> for ConditionOperator {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "gt" => Self::Gt,
            "gte" => Self::Gte,
            "lt" => Self::Lt,
            "lte" => Self::Lte,
            "eq" => Self::Eq,
            "ne" => Self::Ne,
            "contains" => Self::Contains,
            _ => Self::Unknown(raw),
        }
    }
}

impl From<ConditionOperator> for String {
    fn from(op: ConditionOperator) -> Self {
        op.as_str().to_string()
    }
}

impl fmt::Display for ConditionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Run-condition of a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepCondition {
    /// Free-form classification (e.g. `threshold`, `result_match`).
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub condition_type: String,
    /// Step whose stored result is inspected.
    #[serde(default)]
    pub source_step: String,
    /// Top-level field of that result; empty means the whole result.
    #[serde(default)]
    pub field: String,
    pub operator: ConditionOperator,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl StepCondition {
    pub fn new(
        source_step: impl Into<String>,
        field: impl Into<String>,
        operator: ConditionOperator,
        value: serde_json::Value,
    ) -> Self {
        Self {
            condition_type: String::new(),
            source_step: source_step.into(),
            field: field.into(),
            operator,
            value,
        }
    }

    pub fn with_type(mut self, condition_type: impl Into<String>) -> Self {
        self.condition_type = condition_type.into();
        self
    }
}

/// Reshapes a tool result before it is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputTransform {
    /// Keep only the value of one top-level field.
    ExtractField { field: String },
    /// Rename top-level keys (`old -> new`); other keys are kept.
    Rename { mapping: HashMap<String, String> },
    /// Keep only the listed top-level keys.
    Select { fields: Vec<String> },
}

/// One unit of work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowStep {
    #[serde(default)]
    pub id: String,
    /// Name of the tool to invoke.
    #[serde(default)]
    pub tool: String,
    /// Parameter name to literal value or reference expression.
    #[serde(default)]
    pub input: ToolInput,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    /// Key the result is stored under; defaults to the step id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_as: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<StepCondition>,
    /// A failed optional step does not abort the workflow.
    #[serde(default)]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<OutputTransform>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: Metadata,
}

impl WorkflowStep {
    pub fn new(id: impl Into<String>, tool: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tool: tool.into(),
            input: ToolInput::new(),
            depends_on: Vec::new(),
            store_as: None,
            condition: None,
            optional: false,
            transform: None,
            metadata: HashMap::new(),
        }
    }

    /// The key this step's result is visible under.
    pub fn store_key(&self) -> &str {
        match self.store_as.as_deref() {
            Some(key) if !key.is_empty() => key,
            _ => &self.id,
        }
    }

    pub fn with_input(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.input.insert(name.into(), value);
        self
    }

    pub fn depends_on(mut self, step_id: impl Into<String>) -> Self {
        self.depends_on.push(step_id.into());
        self
    }

    pub fn store_as(mut self, key: impl Into<String>) -> Self {
        self.store_as = Some(key.into());
        self
    }

    pub fn with_condition(mut self, condition: StepCondition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn with_transform(mut self, transform: OutputTransform) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// A registered workflow definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub workflow_type: WorkflowType,
    #[serde(default)]
    pub steps: Vec<WorkflowStep>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: Metadata,
    /// Set by the registry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Workflow {
    pub fn new(id: impl Into<String>, name: impl Into<String>, workflow_type: WorkflowType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            workflow_type,
            steps: Vec::new(),
            metadata: HashMap::new(),
            created_at: None,
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn with_step(mut self, step: WorkflowStep) -> Self {
        self.steps.push(step);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn step(&self, id: &str) -> Option<&WorkflowStep> {
        self.steps.iter().find(|s| s.id == id)
    }

    pub fn summary(&self) -> WorkflowSummary {
        WorkflowSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            workflow_type: self.workflow_type.clone(),
            description: self.description.clone(),
            step_count: self.steps.len(),
        }
    }
}

/// Listing entry for a registered workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub workflow_type: WorkflowType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub step_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_workflow_type_parsing() {
        assert_eq!(WorkflowType::from("Sequential".to_string()), WorkflowType::Sequential);
        assert_eq!(WorkflowType::from("parallel".to_string()), WorkflowType::Parallel);
        assert_eq!(
            WorkflowType::from("loop".to_string()),
            WorkflowType::Unknown("loop".into())
        );
        assert_eq!(WorkflowType::default(), WorkflowType::Unknown(String::new()));
    }

    #[test]
    fn test_store_key_defaults_to_id() {
        let step = WorkflowStep::new("s1", "think");
        assert_eq!(step.store_key(), "s1");
        assert_eq!(step.clone().store_as("analysis").store_key(), "analysis");
        assert_eq!(step.store_as("").store_key(), "s1");
    }

    #[test]
    fn test_deserialize_workflow() {
        let wf: Workflow = serde_json::from_value(json!({
            "id": "wf-1",
            "name": "Analyse",
            "type": "conditional",
            "steps": [
                {
                    "id": "s1",
                    "tool": "think",
                    "input": {"content": "$problem"},
                    "store_as": "analysis"
                },
                {
                    "id": "s2",
                    "tool": "make-decision",
                    "depends_on": ["s1"],
                    "optional": true,
                    "condition": {
                        "type": "threshold",
                        "source_step": "s1",
                        "field": "confidence",
                        "operator": "gt",
                        "value": 0.5
                    },
                    "transform": {"type": "extract_field", "field": "decision"}
                }
            ]
        }))
        .unwrap();

        assert_eq!(wf.workflow_type, WorkflowType::Conditional);
        assert_eq!(wf.steps.len(), 2);
        assert_eq!(wf.steps[0].input["content"], "$problem");
        let cond = wf.steps[1].condition.as_ref().unwrap();
        assert_eq!(cond.operator, ConditionOperator::Gt);
        assert_eq!(cond.condition_type, "threshold");
        assert!(wf.steps[1].optional);
        assert_eq!(
            wf.steps[1].transform,
            Some(OutputTransform::ExtractField {
                field: "decision".into()
            })
        );
    }

    #[test]
    fn test_deserialize_tolerates_missing_fields() {
        let wf: Workflow = serde_json::from_value(json!({"type": "bogus"})).unwrap();
        assert!(wf.id.is_empty());
        assert!(wf.steps.is_empty());
        assert_eq!(wf.workflow_type, WorkflowType::Unknown("bogus".into()));
    }

    #[test]
    fn test_serialize_type_as_string() {
        let wf = Workflow::new("wf", "Wf", WorkflowType::Parallel)
            .with_step(WorkflowStep::new("s1", "echo"));
        let json = serde_json::to_value(&wf).unwrap();
        assert_eq!(json["type"], "parallel");
        assert!(json.get("created_at").is_none());
        assert!(json["steps"][0].get("depends_on").is_none());
    }

    #[test]
    fn test_summary() {
        let wf = Workflow::new("wf", "Wf", WorkflowType::Sequential)
            .with_description("demo")
            .with_step(WorkflowStep::new("a", "echo"))
            .with_step(WorkflowStep::new("b", "echo"));
        let summary = wf.summary();
        assert_eq!(summary.step_count, 2);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["type"], "sequential");
        assert_eq!(json["description"], "demo");
    }

    #[test]
    fn test_transform_variants() {
        let rename: OutputTransform =
            serde_json::from_value(json!({"type": "rename", "mapping": {"a": "b"}})).unwrap();
        assert!(matches!(rename, OutputTransform::Rename { .. }));

        let select: OutputTransform =
            serde_json::from_value(json!({"type": "select", "fields": ["a"]})).unwrap();
        assert_eq!(
            select,
            OutputTransform::Select {
                fields: vec!["a".into()]
            }
        );
    }
}
