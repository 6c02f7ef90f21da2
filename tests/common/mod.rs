//! Shared test helpers: mock provider, scripted tool caller, scripted reasoning.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use agent_bridge::error::BridgeError;
use agent_bridge::provider::{ChatModel, ChatReply, ChatRequest};
use agent_bridge::reasoning::ReasoningEngine;
use agent_bridge::tools::{Tool, ToolCaller, ToolPayload};
use agent_bridge::types::{FinishReason, TokenUsage, ToolCallRequest};

/// A mock chat model that returns canned replies in order and records requests.
#[derive(Default)]
pub struct MockProvider {
    replies: Mutex<Vec<ChatReply>>,
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a text response.
    pub fn queue_response(&self, text: &str) {
        self.replies.lock().unwrap().push(ChatReply {
            text: text.to_string(),
            usage: TokenUsage {
                prompt_tokens: 10,
                completion_tokens: 20,
                total_tokens: 30,
            },
            tool_calls: vec![],
            finish_reason: Some(FinishReason::Stop),
        });
    }

    /// Queue a tool call response.
    pub fn queue_tool_call(&self, id: &str, name: &str, args: Value) {
        self.replies.lock().unwrap().push(ChatReply {
            text: String::new(),
            usage: TokenUsage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            },
            tool_calls: vec![ToolCallRequest {
                id: id.to_string(),
                name: name.to_string(),
                arguments: args,
            }],
            finish_reason: Some(FinishReason::ToolCalls),
        });
    }
}

#[async_trait]
impl ChatModel for MockProvider {
    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_id(&self) -> &str {
        "mock-model"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatReply, BridgeError> {
        self.requests.lock().unwrap().push(request.clone());
        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            return Err(BridgeError::Provider {
                provider: "mock".into(),
                message: "no queued reply".into(),
            });
        }
        Ok(replies.remove(0))
    }
}

/// Tool caller answering from a per-tool script and recording every call.
///
/// Tools without a script fail like an unreachable server.
#[derive(Default)]
pub struct ScriptedToolCaller {
    script: HashMap<String, Result<Value, String>>,
    pub calls: Mutex<Vec<(String, ToolPayload)>>,
}

impl ScriptedToolCaller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ok(mut self, tool: &str, value: Value) -> Self {
        self.script.insert(tool.to_string(), Ok(value));
        self
    }

    pub fn fail(mut self, tool: &str, message: &str) -> Self {
        self.script.insert(tool.to_string(), Err(message.to_string()));
        self
    }

    pub fn call_names(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(n, _)| n.clone()).collect()
    }
}

impl ToolCaller for ScriptedToolCaller {
    fn call_tool(&self, tool_name: &str, payload: ToolPayload) -> Result<Value, BridgeError> {
        self.calls
            .lock()
            .unwrap()
            .push((tool_name.to_string(), payload));
        match self.script.get(tool_name) {
            Some(Ok(value)) => Ok(value.clone()),
            Some(Err(message)) => Err(BridgeError::ToolExecution {
                tool_name: tool_name.to_string(),
                message: message.clone(),
            }),
            None => Err(BridgeError::Stream(format!(
                "call_tool: MCP transport closed ({tool_name})"
            ))),
        }
    }
}

/// Reasoning engine with a fixed answer (or failure) that records prompts.
pub struct ScriptedReasoning {
    answer: Result<String, String>,
    pub prompts: Mutex<Vec<(String, Vec<String>)>>,
}

impl ScriptedReasoning {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: Ok(answer.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            answer: Err(message.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ReasoningEngine for ScriptedReasoning {
    async fn answer(&self, prompt: &str, tools: &[Arc<dyn Tool>]) -> Result<String, BridgeError> {
        self.prompts.lock().unwrap().push((
            prompt.to_string(),
            tools.iter().map(|t| t.name().to_string()).collect(),
        ));
        self.answer.clone().map_err(|message| BridgeError::Provider {
            provider: "scripted".into(),
            message,
        })
    }
}
