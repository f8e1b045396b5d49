//! Output transforms applied before a result is stored.

use serde_json::Value;
use thinking_protocols::value_kind;

use crate::definition::OutputTransform;
use crate::error::StepError;

impl OutputTransform {
    /// Reshape `result`. Every transform expects an object.
    pub fn apply(&self, result: Value) -> Result<Value, StepError> {
        let Value::Object(mut map) = result else {
            return Err(StepError::Transform(format!(
                "expected an object result, got a {}",
                value_kind(&result)
            )));
        };

        match self {
            Self::ExtractField { field } => map
                .remove(field)
                .ok_or_else(|| StepError::Transform(format!("result has no field '{}'", field))),
            Self::Rename { mapping } => {
                let renamed = map
                    .into_iter()
                    .map(|(key, value)| match mapping.get(&key) {
                        Some(new_key) => (new_key.clone(), value),
                        None => (key, value),
                    })
                    .collect();
                Ok(Value::Object(renamed))
            }
            Self::Select { fields } => {
                let selected = fields
                    .iter()
                    .filter_map(|f| map.remove(f).map(|v| (f.clone(), v)))
                    .collect();
                Ok(Value::Object(selected))
            }
        }
    }
}
