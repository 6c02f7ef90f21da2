//! Client for run-protocol servers.
//!
//! Servers in the wild disagree on the run schema: some want `agent`, some
//! want `agent_name`, and they return output as parts, strings, or bare
//! JSON. [`RunClient`] tries the structured schema first and falls back
//! once to a raw request when the server rejects or garbles it.

use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::{BridgeConfig, BridgeTimeouts};
use crate::error::{BridgeError, Result};
use crate::normalize::{normalize_output, OutputItem};
use crate::provider::http::{build_client, status_to_error};
use crate::types::{Message, MessagePart, Run, RunStatus};

/// Agents tried, in order, when the caller does not name one.
pub const PREFERRED_AGENTS: [&str; 3] = ["agent", "chat_agent", "echo"];

/// Shown when no agent can be selected.
pub const NO_AGENTS_TIP: &str =
    "Tip: ensure your ACP server is running and the URL (and prefix) is correct.";

/// Placeholder for a named run without input.
pub const NO_INPUT_LABEL: &str = "(no input)";

/// Pick the default agent from a discovered list.
pub fn pick_default_agent(names: &[String]) -> Option<String> {
    PREFERRED_AGENTS
        .iter()
        .find(|preferred| names.iter().any(|n| n == *preferred))
        .map(|preferred| preferred.to_string())
        .or_else(|| names.first().cloned())
}

/// Agent names from a discovery body: `{"agents": ["a"]}` or
/// `{"agents": [{"name": "a"}]}`. Anything else is skipped.
pub fn parse_agent_names(body: &Value) -> Vec<String> {
    body.get("agents")
        .and_then(Value::as_array)
        .map(|agents| {
            agents
                .iter()
                .filter_map(|item| match item {
                    Value::String(name) => Some(name.clone()),
                    Value::Object(map) => map.get("name").and_then(Value::as_str).map(str::to_string),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Output of a raw run response object: `output`, else `data`, whichever
/// is truthy first.
pub fn extract_raw_output(body: &Value) -> Vec<OutputItem> {
    let out = ["output", "data"]
        .iter()
        .filter_map(|key| body.get(*key))
        .find(|value| is_truthy(value));

    match out {
        None => Vec::new(),
        Some(Value::Array(items)) => items.iter().cloned().map(OutputItem::Value).collect(),
        Some(Value::String(text)) => vec![OutputItem::Text(text.clone())],
        Some(other) => vec![OutputItem::Value(other.clone())],
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Talks to one run-protocol server.
#[derive(Debug, Clone)]
pub struct RunClient {
    base_url: String,
    http: reqwest::Client,
    timeouts: BridgeTimeouts,
}

impl RunClient {
    /// Client for the configured run URL.
    pub fn new(config: &BridgeConfig) -> Result<Self> {
        Self::with_base_url(config, config.run_url())
    }

    /// Client for an explicit base URL, with the configured timeouts.
    pub fn with_base_url(config: &BridgeConfig, base_url: &str) -> Result<Self> {
        let timeouts = *config.timeouts();
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: build_client(timeouts.run)?,
            timeouts,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Names of the agents the server advertises. Never fails: any problem
    /// yields an empty list.
    pub async fn discover_agents(&self) -> Vec<String> {
        match self.fetch_agents().await {
            Ok(names) => {
                debug!(url = %self.base_url, agents = ?names, "Discovered agents");
                names
            }
            Err(e) => {
                debug!(url = %self.base_url, error = %e, "Agent discovery failed");
                Vec::new()
            }
        }
    }

    async fn fetch_agents(&self) -> Result<Vec<String>> {
        let resp = self
            .http
            .get(self.url("/agents"))
            .timeout(self.timeouts.discovery)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status.as_u16(), &body));
        }
        let body: Value = resp.json().await?;
        Ok(parse_agent_names(&body))
    }

    /// `agent`, `chat_agent`, `echo`, else the first advertised agent.
    pub async fn choose_default_agent(&self) -> Option<String> {
        pick_default_agent(&self.discover_agents().await)
    }

    /// Run `agent_name` with optional text input and return its raw output.
    pub async fn run(&self, agent_name: &str, text: Option<&str>) -> Result<Vec<OutputItem>> {
        match self.run_primary(agent_name, text).await {
            Ok(output) => Ok(output),
            Err(e) if e.is_protocol_error() => {
                warn!(agent = agent_name, error = %e, "Primary run schema rejected, retrying with raw request");
                self.run_fallback(agent_name, text).await
            }
            Err(e) => Err(e),
        }
    }

    /// [`run`](Self::run), then flatten the output to strings.
    pub async fn run_normalized(&self, agent_name: &str, text: Option<&str>) -> Result<Vec<String>> {
        let output = self.run(agent_name, text).await?;
        Ok(normalize_output(Some(output)))
    }

    async fn run_primary(&self, agent_name: &str, text: Option<&str>) -> Result<Vec<OutputItem>> {
        let parts = text.map(MessagePart::text).into_iter().collect();
        let body = json!({
            "agent": agent_name,
            "input": [Message::user(parts)],
        });

        debug!(agent = agent_name, url = %self.base_url, "POST /runs");
        let resp = self
            .http
            .post(self.url("/runs"))
            .timeout(self.timeouts.run)
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status.as_u16(), &body));
        }

        let run: Run = resp.json().await?;
        if run.status == RunStatus::Failed {
            let message = run
                .error
                .map(|e| format!("{}: {}", e.code, e.message))
                .unwrap_or_else(|| "run failed".to_string());
            return Err(BridgeError::Protocol(message));
        }

        Ok(run
            .output
            .into_iter()
            .flat_map(|message| message.parts)
            .map(OutputItem::Part)
            .collect())
    }

    async fn run_fallback(&self, agent_name: &str, text: Option<&str>) -> Result<Vec<OutputItem>> {
        let input = match text {
            Some(text) => json!([{ "parts": [{ "content": text }] }]),
            None => json!([]),
        };
        let body = json!({ "agent_name": agent_name, "input": input });

        debug!(agent = agent_name, url = %self.base_url, "POST /runs (raw)");
        let resp = self
            .http
            .post(self.url("/runs"))
            .timeout(self.timeouts.fallback)
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status.as_u16(), &body));
        }

        let body: Value = resp.json().await?;
        if !body.is_object() {
            return Err(BridgeError::Protocol(format!(
                "raw run response is not a JSON object: {body}"
            )));
        }
        Ok(extract_raw_output(&body))
    }

    /// Send `text` to the default agent and render the reply as
    /// `"<name> says: <output>"`.
    pub async fn ask_anything(&self, text: &str) -> Result<String> {
        let Some(name) = self.choose_default_agent().await else {
            return Ok(format!("No agents found at: {}\n{NO_AGENTS_TIP}", self.base_url));
        };
        let output = self.run_normalized(&name, Some(text)).await?;
        Ok(format!("{name} says: {}", output.concat()))
    }

    /// Run a specific agent and render the reply as
    /// `"<name>(<input>) → <output>"`. Fails with
    /// [`BridgeError::AgentNotFound`] when the server does not advertise it.
    pub async fn call_named(&self, agent_name: &str, text: Option<&str>) -> Result<String> {
        let names = self.discover_agents().await;
        if !names.iter().any(|n| n == agent_name) {
            return Err(BridgeError::AgentNotFound {
                name: agent_name.to_string(),
                available: names,
            });
        }
        let output = self.run_normalized(agent_name, text).await?;
        let label = text.unwrap_or(NO_INPUT_LABEL);
        Ok(format!("{agent_name}({label}) → {}", output.concat()))
    }
}
