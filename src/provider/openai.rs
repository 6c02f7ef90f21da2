//! OpenAI chat-completions client used by the reasoning engine.

use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::tools::render_value;
use crate::types::{ChatTurn, FinishReason, TokenUsage, ToolCallRequest};

use super::http::{bearer_headers, build_client, status_to_error};
use super::{ChatModel, ChatReply, ChatRequest, ToolSpec};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Chat completions against OpenAI or any API-compatible endpoint.
pub struct OpenAiProvider {
    model: String,
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAiProvider {
    pub fn new(
        model: impl Into<String>,
        api_key: impl Into<String>,
        base_url: Option<String>,
        client: reqwest::Client,
    ) -> Self {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self {
            model: model.into(),
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Build from config. Fails when no OpenAI key is configured.
    pub fn from_config(config: &BridgeConfig) -> Result<Self, BridgeError> {
        let api_key = config
            .get_api_key("openai")
            .ok_or_else(|| BridgeError::Configuration("Missing OPENAI_API_KEY".into()))?;
        Ok(Self::new(
            config.reasoning_model(),
            api_key,
            config.get_base_url("openai").map(str::to_string),
            build_client(config.timeouts().reasoning)?,
        ))
    }

    fn wire_request<'a>(&'a self, request: &'a ChatRequest) -> WireRequest<'a> {
        WireRequest {
            model: &self.model,
            messages: request.turns.iter().map(wire_message).collect(),
            tools: request.tools.iter().map(WireTool::from).collect(),
            max_tokens: request.settings.max_tokens,
            temperature: request.settings.temperature,
            seed: request.settings.seed,
        }
    }
}

#[async_trait]
impl ChatModel for OpenAiProvider {
    fn provider_name(&self) -> &str {
        "openai"
    }

    fn model_id(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatReply, BridgeError> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!(model = %self.model, turns = request.turns.len(), tools = request.tools.len(), "POST chat/completions");

        let resp = self
            .client
            .post(&url)
            .headers(bearer_headers(&self.api_key))
            .json(&self.wire_request(request))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status.as_u16(), &body));
        }

        let data: WireResponse = resp.json().await?;
        let Some(choice) = data.choices.into_iter().next() else {
            return Err(BridgeError::Provider {
                provider: "openai".into(),
                message: "response has no choices".into(),
            });
        };

        Ok(ChatReply {
            text: choice.message.content.unwrap_or_default(),
            tool_calls: choice
                .message
                .tool_calls
                .into_iter()
                .map(WireToolCall::into_request)
                .collect(),
            usage: data.usage.unwrap_or_default(),
            finish_reason: choice
                .finish_reason
                .as_deref()
                .and_then(|r| FinishReason::from_str(r).ok()),
        })
    }
}

fn wire_message(turn: &ChatTurn) -> Value {
    match turn {
        ChatTurn::Tool(outcome) => json!({
            "role": "tool",
            "tool_call_id": outcome.call_id,
            "content": render_value(&outcome.value),
        }),
        ChatTurn::Assistant { text, tool_calls } if !tool_calls.is_empty() => {
            let calls: Vec<Value> = tool_calls
                .iter()
                .map(|call| {
                    json!({
                        "id": call.id,
                        "type": "function",
                        "function": { "name": call.name, "arguments": call.arguments.to_string() },
                    })
                })
                .collect();
            let content = if text.is_empty() { Value::Null } else { Value::String(text.clone()) };
            json!({ "role": "assistant", "content": content, "tool_calls": calls })
        }
        other => json!({ "role": other.role(), "content": other.text() }),
    }
}

#[derive(Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
}

#[derive(Serialize)]
struct WireTool<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    function: &'a ToolSpec,
}

impl<'a> From<&'a ToolSpec> for WireTool<'a> {
    fn from(function: &'a ToolSpec) -> Self {
        Self {
            kind: "function",
            function,
        }
    }
}

#[derive(Deserialize)]
struct WireResponse {
    choices: Vec<WireChoice>,
    usage: Option<TokenUsage>,
}

#[derive(Deserialize)]
struct WireChoice {
    message: WireMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct WireMessage {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<WireToolCall>,
}

#[derive(Deserialize)]
struct WireToolCall {
    id: String,
    function: WireFunction,
}

#[derive(Deserialize)]
struct WireFunction {
    name: String,
    arguments: String,
}

impl WireToolCall {
    fn into_request(self) -> ToolCallRequest {
        let arguments = serde_json::from_str(&self.function.arguments)
            .unwrap_or(Value::String(self.function.arguments));
        ToolCallRequest {
            id: self.id,
            name: self.function.name,
            arguments,
        }
    }
}
