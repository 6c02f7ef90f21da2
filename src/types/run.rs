//! Run-protocol (ACP) wire types: messages, parts, runs and agent manifests.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;
use uuid::Uuid;

const TEXT_PLAIN: &str = "text/plain";

/// One piece of a message. `content` is text or an opaque JSON payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MessagePart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<serde_json::Value>,
}

impl MessagePart {
    /// A plain-text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            name: None,
            content_type: Some(TEXT_PLAIN.to_string()),
            content: Some(serde_json::Value::String(text.into())),
        }
    }

    /// The content if it is a string.
    pub fn as_text(&self) -> Option<&str> {
        self.content.as_ref().and_then(|c| c.as_str())
    }
}

/// One turn of input or output: an ordered list of parts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub parts: Vec<MessagePart>,
}

fn default_role() -> String {
    "user".to_string()
}

impl Message {
    pub fn user(parts: Vec<MessagePart>) -> Self {
        Self {
            role: default_role(),
            parts,
        }
    }

    /// Output message attributed to the named agent.
    pub fn agent(agent_name: &str, parts: Vec<MessagePart>) -> Self {
        Self {
            role: format!("agent/{agent_name}"),
            parts,
        }
    }
}

/// Renders the concatenated string content of all parts.
impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for part in &self.parts {
            if let Some(text) = part.as_text() {
                f.write_str(text)?;
            }
        }
        Ok(())
    }
}

/// Joins every string part of every message with single spaces, then trims.
///
/// Non-string parts are skipped; an empty input yields an empty string.
pub fn extract_text(messages: &[Message]) -> String {
    messages
        .iter()
        .flat_map(|m| m.parts.iter())
        .filter_map(MessagePart::as_text)
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

/// Lifecycle of a run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RunStatus {
    Created,
    InProgress,
    Awaiting,
    Cancelling,
    Cancelled,
    Completed,
    Failed,
}

/// How the server should deliver a run's output.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RunMode {
    #[default]
    Sync,
    Stream,
}

/// Error body used by the run protocol, both inside a failed run and as an
/// HTTP error response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunError {
    pub code: String,
    pub message: String,
}

/// A run request. The agent may be addressed as `agent` or `agent_name`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunCreateRequest {
    #[serde(alias = "agent_name")]
    pub agent: String,
    #[serde(default)]
    pub input: Vec<Message>,
    #[serde(default)]
    pub mode: RunMode,
}

/// A completed (or failed) run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Run {
    pub run_id: Uuid,
    pub agent_name: String,
    pub status: RunStatus,
    #[serde(default)]
    pub output: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RunError>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl Run {
    /// A fresh run in the `created` state.
    pub fn created(agent_name: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            agent_name: agent_name.into(),
            status: RunStatus::Created,
            output: Vec::new(),
            error: None,
            created_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Mark completed with the given output chunks as one agent message.
    pub fn complete(mut self, chunks: Vec<String>) -> Self {
        let parts = chunks.into_iter().map(MessagePart::text).collect();
        self.output = vec![Message::agent(&self.agent_name, parts)];
        self.status = RunStatus::Completed;
        self.finished_at = Some(Utc::now());
        self
    }
}

/// Discovery entry for one registered agent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentManifest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// `GET /agents` response body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentList {
    pub agents: Vec<AgentManifest>,
}
