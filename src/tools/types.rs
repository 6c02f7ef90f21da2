//! JSON Schema for tool arguments.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Object schema describing a tool's arguments, as sent to the chat model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolParameters(Value);

impl ToolParameters {
    /// A tool that takes no arguments.
    pub fn none() -> Self {
        Self::from_properties(Map::new(), &[])
    }

    /// A tool that takes exactly one required string argument.
    pub fn single_string(key: &str, description: &str) -> Self {
        let mut properties = Map::new();
        properties.insert(
            key.to_string(),
            json!({ "type": "string", "description": description }),
        );
        Self::from_properties(properties, &[key])
    }

    fn from_properties(properties: Map<String, Value>, required: &[&str]) -> Self {
        Self(json!({
            "type": "object",
            "properties": properties,
            "required": required,
        }))
    }

    pub fn schema(&self) -> &Value {
        &self.0
    }

    /// Names of the required arguments.
    pub fn required(&self) -> Vec<&str> {
        self.0["required"]
            .as_array()
            .map(|keys| keys.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}
