//! Tool trait and closure-based tool wrapper.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::caller::{call_tool_async, ToolCaller, ToolPayload};
use super::catalog::ToolKind;
use super::types::ToolParameters;
use crate::error::BridgeError;

/// A tool the reasoning engine may call.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (must match what the model calls).
    fn name(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> &str;

    /// JSON Schema parameters.
    fn parameters(&self) -> &ToolParameters;

    /// Execute the tool with parsed arguments.
    async fn execute(&self, args: &ToolPayload) -> Result<Value, BridgeError>;
}

type ToolHandler = dyn Fn(ToolPayload) -> Pin<Box<dyn Future<Output = Result<Value, BridgeError>> + Send>>
    + Send
    + Sync;

/// Closure-based tool.
pub struct AgentTool {
    name: String,
    description: String,
    parameters: ToolParameters,
    handler: Arc<ToolHandler>,
}

impl AgentTool {
    /// Create a tool from a closure.
    pub fn new<F, Fut>(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: ToolParameters,
        handler: F,
    ) -> Self
    where
        F: Fn(ToolPayload) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, BridgeError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
            handler: Arc::new(move |args| Box::pin(handler(args))),
        }
    }

    /// A catalog tool whose calls go through `caller`.
    ///
    /// Only the tool's own argument is forwarded; anything else the model
    /// invents is dropped.
    pub fn remote(kind: ToolKind, caller: Arc<dyn ToolCaller>) -> Self {
        Self::new(kind.name(), kind.description(), kind.parameters(), move |args| {
            let caller = Arc::clone(&caller);
            async move {
                let key = kind.argument();
                let value = args
                    .get(key)
                    .cloned()
                    .ok_or_else(|| BridgeError::InvalidArgument(format!(
                        "{} requires '{key}'",
                        kind.name()
                    )))?;
                let mut payload = ToolPayload::new();
                payload.insert(key.to_string(), value);
                call_tool_async(caller, kind.name(), payload).await
            }
        })
    }
}

#[async_trait]
impl Tool for AgentTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters(&self) -> &ToolParameters {
        &self.parameters
    }

    async fn execute(&self, args: &ToolPayload) -> Result<Value, BridgeError> {
        (self.handler)(args.clone()).await
    }
}

impl std::fmt::Debug for AgentTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentTool")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}

/// The tool set handed to the reasoning engine, all backed by `caller`.
pub fn reasoning_tools(caller: Arc<dyn ToolCaller>) -> Vec<Arc<dyn Tool>> {
    ToolKind::reasoning_tools()
        .map(|kind| Arc::new(AgentTool::remote(kind, Arc::clone(&caller))) as Arc<dyn Tool>)
        .collect()
}
