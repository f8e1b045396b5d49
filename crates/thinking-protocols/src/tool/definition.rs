//! Tool definition types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::Metadata;

/// Definition of a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name the tool is invoked by (e.g. `think`, `make-decision`).
    pub id: String,

    /// Human-readable name.
    pub name: String,

    /// Description of what the tool does.
    pub description: String,

    /// JSON Schema for the parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters_schema: Option<serde_json::Value>,

    /// Additional metadata.
    #[serde(default)]
    pub metadata: Metadata,
}

impl ToolDefinition {
    /// Create a new tool definition.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            parameters_schema: None,
            metadata: HashMap::new(),
        }
    }

    /// Set the parameters schema.
    pub fn with_parameters_schema(mut self, schema: serde_json::Value) -> Self {
        self.parameters_schema = Some(schema);
        self
    }

    /// Attach a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_new() {
        let def = ToolDefinition::new("think", "Think", "Record a thought");
        assert_eq!(def.id, "think");
        assert!(def.parameters_schema.is_none());
        assert!(def.metadata.is_empty());
    }

    #[test]
    fn test_definition_serialization_skips_empty_schema() {
        let def = ToolDefinition::new("think", "Think", "Record a thought");
        let json = serde_json::to_value(&def).unwrap();
        assert!(json.get("parameters_schema").is_none());
        assert_eq!(json["id"], "think");
    }

    #[test]
    fn test_definition_builders() {
        let def = ToolDefinition::new("remote", "Remote", "Forwarded")
            .with_parameters_schema(serde_json::json!({"type": "object"}))
            .with_metadata("url", serde_json::json!("http://localhost"));
        assert_eq!(def.parameters_schema.unwrap()["type"], "object");
        assert_eq!(def.metadata["url"], "http://localhost");
    }
}
