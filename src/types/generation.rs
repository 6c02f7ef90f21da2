//! Generation settings and results for the reasoning engine.

use bon::Builder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::chat::ChatTurn;
use super::usage::TokenUsage;

/// Sampling knobs forwarded to the chat model. Unset fields are omitted.
#[derive(Debug, Clone, Builder, Serialize, Deserialize, Default)]
pub struct GenerationSettings {
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
    pub seed: Option<u64>,
}

/// Why the model stopped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ToolCalls,
    ContentFilter,
}

/// Outcome of one tool-loop run.
#[derive(Debug, Clone)]
pub struct ToolLoopOutcome {
    /// Final assistant text.
    pub text: String,
    /// Chat-model round trips taken.
    pub steps: usize,
    /// Every turn, including tool requests and their outcomes.
    pub transcript: Vec<ChatTurn>,
    pub usage: TokenUsage,
    pub finish_reason: Option<FinishReason>,
}
