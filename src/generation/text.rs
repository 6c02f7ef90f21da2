//! Text generation with a tool loop.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::BridgeError;
use crate::provider::{ChatModel, ChatRequest, ToolSpec};
use crate::tools::{Tool, ToolPayload};
use crate::types::{ChatTurn, FinishReason, GenerationSettings, TokenUsage, ToolCallOutcome, ToolCallRequest, ToolLoopOutcome};

/// Maximum chat-model round trips before giving up on a final answer.
pub const MAX_TOOL_ITERATIONS: usize = 10;

/// Ask `model` until it answers without tool calls.
///
/// Requested tools run in order and their outcomes are appended to the
/// conversation. A failing or unknown tool becomes an error outcome the
/// model can react to; only model errors abort the loop. After
/// [`MAX_TOOL_ITERATIONS`] round trips the last text is returned with
/// [`FinishReason::Length`].
pub async fn generate_text(
    model: &dyn ChatModel,
    turns: Vec<ChatTurn>,
    settings: GenerationSettings,
    tools: &[Arc<dyn Tool>],
) -> Result<ToolLoopOutcome, BridgeError> {
    let mut request = ChatRequest {
        turns,
        settings,
        tools: tools.iter().map(|t| ToolSpec::of(t.as_ref())).collect(),
    };
    let mut usage = TokenUsage::default();
    let mut last_text = String::new();

    for step in 1..=MAX_TOOL_ITERATIONS {
        debug!(step, model = model.model_id(), "Tool loop round trip");
        let reply = model.complete(&request).await?;
        usage += reply.usage;

        if reply.tool_calls.is_empty() {
            return Ok(ToolLoopOutcome {
                text: reply.text,
                steps: step,
                transcript: request.turns,
                usage,
                finish_reason: reply.finish_reason,
            });
        }

        let mut outcomes = Vec::with_capacity(reply.tool_calls.len());
        for call in &reply.tool_calls {
            outcomes.push(run_tool(tools, call).await);
        }
        last_text = reply.text.clone();
        request
            .turns
            .push(ChatTurn::assistant(reply.text, reply.tool_calls));
        request.turns.extend(outcomes.into_iter().map(ChatTurn::Tool));
    }

    warn!(limit = MAX_TOOL_ITERATIONS, "Tool loop limit reached without a final answer");
    Ok(ToolLoopOutcome {
        text: last_text,
        steps: MAX_TOOL_ITERATIONS,
        transcript: request.turns,
        usage,
        finish_reason: Some(FinishReason::Length),
    })
}

async fn run_tool(tools: &[Arc<dyn Tool>], call: &ToolCallRequest) -> ToolCallOutcome {
    let result = match tools.iter().find(|t| t.name() == call.name) {
        None => Err(BridgeError::ToolExecution {
            tool_name: call.name.clone(),
            message: "no such tool".into(),
        }),
        Some(tool) => match &call.arguments {
            serde_json::Value::Object(args) => tool.execute(args).await,
            serde_json::Value::Null => tool.execute(&ToolPayload::new()).await,
            other => Err(BridgeError::InvalidArgument(format!(
                "arguments for {} must be a JSON object, got {other}",
                call.name
            ))),
        },
    };

    match result {
        Ok(value) => ToolCallOutcome::ok(&call.id, value),
        Err(e) => {
            warn!(tool = %call.name, error = %e, "Tool call failed inside reasoning");
            ToolCallOutcome::failed(&call.id, &e)
        }
    }
}
