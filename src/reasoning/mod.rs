//! The reasoning fallback: free-text prompt in, text answer out, with tools.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::generation::generate_text;
use crate::provider::{ChatModel, OpenAiProvider};
use crate::tools::Tool;
use crate::types::{ChatTurn, GenerationSettings};

const SYSTEM_PROMPT: &str = "You are a helpful assistant. Answer the user's request directly. \
Call a tool when it can supply facts you do not have, then answer using its result.";

/// Answers a prompt, possibly by calling some of the given tools.
#[async_trait]
pub trait ReasoningEngine: Send + Sync {
    async fn answer(&self, prompt: &str, tools: &[Arc<dyn Tool>]) -> Result<String, BridgeError>;
}

/// A chat model driven through the tool loop.
pub struct ToolLoopEngine {
    model: Arc<dyn ChatModel>,
    settings: GenerationSettings,
}

impl ToolLoopEngine {
    /// Deterministic settings (temperature 0).
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self {
            model,
            settings: GenerationSettings::builder().temperature(0.0).build(),
        }
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    /// The configured OpenAI model, or `None` when no key is set.
    pub fn from_config(config: &BridgeConfig) -> Result<Option<Self>, BridgeError> {
        if !config.has_credentials("openai") {
            tracing::info!("OPENAI_API_KEY not set; reasoning fallback disabled");
            return Ok(None);
        }
        let provider = OpenAiProvider::from_config(config)?;
        Ok(Some(Self::new(Arc::new(provider))))
    }
}

#[async_trait]
impl ReasoningEngine for ToolLoopEngine {
    async fn answer(&self, prompt: &str, tools: &[Arc<dyn Tool>]) -> Result<String, BridgeError> {
        let turns = vec![ChatTurn::system(SYSTEM_PROMPT), ChatTurn::user(prompt)];
        let outcome = generate_text(self.model.as_ref(), turns, self.settings.clone(), tools).await?;
        tracing::debug!(steps = outcome.steps, tokens = outcome.usage.total_tokens, "Reasoning finished");

        if outcome.text.trim().is_empty() {
            return Err(BridgeError::Provider {
                provider: self.model.provider_name().to_string(),
                message: "model returned no answer".into(),
            });
        }
        Ok(outcome.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_key_means_no_engine() {
        let engine = ToolLoopEngine::from_config(&BridgeConfig::new()).unwrap();
        assert!(engine.is_none());
    }

    #[test]
    fn key_enables_engine() {
        let config = BridgeConfig::new().with_api_key("openai", "sk-test");
        assert!(ToolLoopEngine::from_config(&config).unwrap().is_some());
    }
}
