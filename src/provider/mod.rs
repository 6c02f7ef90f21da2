//! Chat-model seam for the reasoning engine, and its OpenAI implementation.

pub mod http;
pub mod openai;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::BridgeError;
use crate::tools::Tool;
use crate::types::{ChatTurn, FinishReason, GenerationSettings, TokenUsage, ToolCallRequest};

pub use openai::OpenAiProvider;

/// Everything one chat-model round trip needs.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub turns: Vec<ChatTurn>,
    pub settings: GenerationSettings,
    /// Tools the model may ask for. Empty means tool calling is off.
    pub tools: Vec<ToolSpec>,
}

/// A tool as advertised to the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl ToolSpec {
    pub fn of(tool: &dyn Tool) -> Self {
        Self {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            parameters: tool.parameters().schema().clone(),
        }
    }
}

/// The model's answer: text, tool requests, or both.
#[derive(Debug, Clone, Default)]
pub struct ChatReply {
    pub text: String,
    pub tool_calls: Vec<ToolCallRequest>,
    pub usage: TokenUsage,
    pub finish_reason: Option<FinishReason>,
}

/// A chat model that can answer with text or tool calls.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Short provider label used in errors and logs.
    fn provider_name(&self) -> &str;

    fn model_id(&self) -> &str;

    /// One non-streaming round trip.
    async fn complete(&self, request: &ChatRequest) -> Result<ChatReply, BridgeError>;
}
