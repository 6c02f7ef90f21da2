//! The blocking tool-call seam shared by the router and the reasoning tools.

use std::sync::Arc;

use serde_json::Value;

use crate::error::BridgeError;

/// Tool arguments: string keys to JSON values.
pub type ToolPayload = serde_json::Map<String, Value>;

/// Blocking tool invocation.
///
/// Implementations may block the calling thread for the whole call. Async
/// code goes through [`call_tool_async`].
pub trait ToolCaller: Send + Sync {
    /// Invoke `tool_name` with `payload` and return its data.
    fn call_tool(&self, tool_name: &str, payload: ToolPayload) -> Result<Value, BridgeError>;
}

/// Run a blocking tool call on the blocking pool.
pub async fn call_tool_async(
    caller: Arc<dyn ToolCaller>,
    tool_name: &str,
    payload: ToolPayload,
) -> Result<Value, BridgeError> {
    let name = tool_name.to_string();
    tokio::task::spawn_blocking(move || caller.call_tool(&name, payload))
        .await
        .map_err(|e| BridgeError::ToolExecution {
            tool_name: tool_name.to_string(),
            message: format!("tool call task failed: {e}"),
        })?
}

/// Build a single-entry payload.
pub fn payload(key: &str, value: impl Into<Value>) -> ToolPayload {
    let mut map = ToolPayload::new();
    map.insert(key.to_string(), value.into());
    map
}

/// Render a tool result as output text: strings verbatim, anything else as
/// compact JSON.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
