//! Conversation with the reasoning model.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::BridgeError;

/// One turn of a reasoning conversation, tagged by role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum ChatTurn {
    System {
        text: String,
    },
    User {
        text: String,
    },
    Assistant {
        #[serde(default)]
        text: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolCallRequest>,
    },
    Tool(ToolCallOutcome),
}

impl ChatTurn {
    pub fn system(text: impl Into<String>) -> Self {
        Self::System { text: text.into() }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::User { text: text.into() }
    }

    /// An assistant turn that asks for tool calls (and may carry text too).
    pub fn assistant(text: impl Into<String>, tool_calls: Vec<ToolCallRequest>) -> Self {
        Self::Assistant {
            text: text.into(),
            tool_calls,
        }
    }

    pub fn role(&self) -> &'static str {
        match self {
            Self::System { .. } => "system",
            Self::User { .. } => "user",
            Self::Assistant { .. } => "assistant",
            Self::Tool(_) => "tool",
        }
    }

    /// Text of the turn; a tool turn renders its value.
    pub fn text(&self) -> String {
        match self {
            Self::System { text } | Self::User { text } | Self::Assistant { text, .. } => text.clone(),
            Self::Tool(outcome) => crate::tools::render_value(&outcome.value),
        }
    }
}

/// A tool call the model asked for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    pub id: String,
    pub name: String,
    /// Decoded arguments; a string if the model sent something that is not JSON.
    pub arguments: Value,
}

/// What a requested tool call produced, as reported back to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallOutcome {
    pub call_id: String,
    pub value: Value,
    #[serde(default)]
    pub is_error: bool,
}

impl ToolCallOutcome {
    pub fn ok(call_id: impl Into<String>, value: Value) -> Self {
        Self {
            call_id: call_id.into(),
            value,
            is_error: false,
        }
    }

    /// The error is reported as `{"error": "<message>"}`.
    pub fn failed(call_id: impl Into<String>, error: &BridgeError) -> Self {
        Self {
            call_id: call_id.into(),
            value: serde_json::json!({ "error": error.to_string() }),
            is_error: true,
        }
    }
}
