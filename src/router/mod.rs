//! Heuristic dispatch of free-text requests to tools.
//!
//! A request is matched against a fixed, ordered list of [`RouteStep`]s.
//! Tool steps answer and stop on success; on failure they emit a diagnostic
//! chunk and hand over to the next step. The reasoning step, and finally an
//! echo, catch everything else.

use std::sync::Arc;

use futures::stream::BoxStream;
use futures::StreamExt;
use serde::{Deserialize, Serialize};

use crate::reasoning::ReasoningEngine;
use crate::tools::{call_tool_async, payload, render_value, Tool, ToolCaller, ToolKind, ToolPayload};

/// Lazy, finite, single-use sequence of output chunks.
pub type ChunkStream = BoxStream<'static, String>;

/// Words that look like tickers but never are.
const TICKER_STOP_WORDS: &[&str] = &["CEO", "CFO", "CTO", "USD", "A", "AN", "THE", "IS", "OF", "FOR"];
const DEFAULT_GREETING_NAME: &str = "there";
const CRAWL_MARKER: &str = "crawl:";

pub const EMPTY_INPUT_REPLY: &str = "(empty input)";

/// One candidate handler for a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum RouteStep {
    Finance { ticker: String },
    Greeting { name: String },
    Crawl { query: String },
    Reason,
    Echo,
}

impl RouteStep {
    /// The tool call this step makes, if it is a tool step.
    pub fn tool_call(&self) -> Option<(ToolKind, ToolPayload)> {
        let (kind, value) = match self {
            Self::Finance { ticker } => (ToolKind::YahooFinance, ticker),
            Self::Greeting { name } => (ToolKind::Hello, name),
            Self::Crawl { query } => (ToolKind::WebCrawl, query),
            Self::Reason | Self::Echo => return None,
        };
        Some((kind, payload(kind.argument(), value.as_str())))
    }

    /// Label used in diagnostic chunks.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Finance { .. } => "finance",
            Self::Greeting { .. } => "greeting",
            Self::Crawl { .. } => "crawl",
            Self::Reason => "reasoning",
            Self::Echo => "echo",
        }
    }
}

/// The ordered steps to try for `text`. Empty for blank input.
pub fn plan_routes(text: &str) -> Vec<RouteStep> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let mut steps = Vec::new();
    if let Some(ticker) = extract_ticker(text) {
        steps.push(RouteStep::Finance { ticker });
    }
    if let Some(name) = greeting_name(text) {
        steps.push(RouteStep::Greeting { name });
    }
    if let Some(query) = crawl_query(text) {
        steps.push(RouteStep::Crawl { query });
    }
    steps.push(RouteStep::Reason);
    steps.push(RouteStep::Echo);
    steps
}

/// "nvidia" anywhere maps to NVDA; otherwise the first all-caps alphabetic
/// token of 1 to 6 characters that is not a stop word.
pub fn extract_ticker(text: &str) -> Option<String> {
    if text.to_lowercase().contains("nvidia") {
        return Some("NVDA".to_string());
    }
    text.replace(',', " ")
        .split_whitespace()
        .find(|token| is_ticker_candidate(token))
        .map(str::to_string)
}

fn is_ticker_candidate(token: &str) -> bool {
    let len = token.chars().count();
    (1..=6).contains(&len)
        && token.chars().all(|c| c.is_alphabetic() && c.is_uppercase())
        && !TICKER_STOP_WORDS.contains(&token)
}

/// For text starting with "hello" (any case): everything after the first
/// whitespace run, or "there".
pub fn greeting_name(text: &str) -> Option<String> {
    if !text.to_lowercase().starts_with("hello") {
        return None;
    }
    let name = text
        .split_once(char::is_whitespace)
        .map(|(_, rest)| rest.trim_start())
        .filter(|rest| !rest.is_empty())
        .unwrap_or(DEFAULT_GREETING_NAME);
    Some(name.to_string())
}

/// Everything after the first "crawl:" (any case), trimmed. `None` if absent
/// or empty.
pub fn crawl_query(text: &str) -> Option<String> {
    let start = text.to_ascii_lowercase().find(CRAWL_MARKER)? + CRAWL_MARKER.len();
    let query = text[start..].trim();
    (!query.is_empty()).then(|| query.to_string())
}

/// Diagnostic chunk for a failed tool step.
pub fn tool_error_chunk(stage: &str, error: &impl std::fmt::Display) -> String {
    format!("[agent] {stage} tool error: {error}")
}

pub fn echo_chunk(text: &str) -> String {
    format!("agent received: {text}")
}

/// Routes requests to tools, the reasoning engine, or an echo.
#[derive(Clone)]
pub struct AgentRouter {
    caller: Arc<dyn ToolCaller>,
    reasoning: Option<Arc<dyn ReasoningEngine>>,
    reasoning_tools: Vec<Arc<dyn Tool>>,
}

impl AgentRouter {
    pub fn new(caller: Arc<dyn ToolCaller>) -> Self {
        Self {
            caller,
            reasoning: None,
            reasoning_tools: Vec::new(),
        }
    }

    /// Enable the reasoning step with the tools it may call.
    pub fn with_reasoning(
        mut self,
        engine: Arc<dyn ReasoningEngine>,
        tools: Vec<Arc<dyn Tool>>,
    ) -> Self {
        self.reasoning = Some(engine);
        self.reasoning_tools = tools;
        self
    }

    /// Produce the output chunks for `text`.
    pub fn route(&self, text: &str) -> ChunkStream {
        let text = text.trim().to_string();
        let steps = plan_routes(&text);
        let caller = Arc::clone(&self.caller);
        let reasoning = self.reasoning.clone();
        let tools = self.reasoning_tools.clone();

        let stream = async_stream::stream! {
            if steps.is_empty() {
                yield EMPTY_INPUT_REPLY.to_string();
                return;
            }

            for step in steps {
                if let Some((kind, args)) = step.tool_call() {
                    match call_tool_async(Arc::clone(&caller), kind.name(), args).await {
                        Ok(value) => {
                            tracing::debug!(tool = kind.name(), "Tool step answered");
                            yield render_value(&value);
                            return;
                        }
                        Err(e) => {
                            tracing::warn!(tool = kind.name(), error = %e, "Tool step failed, trying next route");
                            yield tool_error_chunk(step.stage(), &e);
                        }
                    }
                    continue;
                }

                match step {
                    RouteStep::Reason => {
                        let Some(engine) = reasoning.as_ref() else {
                            continue;
                        };
                        match engine.answer(&text, &tools).await {
                            Ok(answer) => {
                                yield answer;
                                return;
                            }
                            Err(e) => {
                                tracing::warn!(error = %e, "Reasoning failed, echoing input");
                            }
                        }
                    }
                    _ => {
                        yield echo_chunk(&text);
                        return;
                    }
                }
            }
        };
        stream.boxed()
    }
}
