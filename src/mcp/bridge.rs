//! Synchronous tool calls over MCP.
//!
//! [`McpToolBridge`] runs each call to completion on a dedicated thread that
//! owns a single-threaded runtime, so the caller never shares or blocks its
//! own executor.

use std::time::Duration;

use serde_json::Value;

use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::tools::caller::{ToolCaller, ToolPayload};
use crate::util::timeout::with_timeout;

use super::client::MCPClient;
use super::transport::StreamableHttpTransport;

/// Calls tools on a streamable-HTTP MCP server, one session per call.
#[derive(Debug, Clone)]
pub struct McpToolBridge {
    url: String,
    timeout: Duration,
}

impl McpToolBridge {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }

    pub fn from_config(config: &BridgeConfig) -> Self {
        Self::new(config.tool_url(), config.timeouts().tool)
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ToolCaller for McpToolBridge {
    fn call_tool(&self, tool_name: &str, payload: ToolPayload) -> Result<Value, BridgeError> {
        let url = self.url.clone();
        let timeout = self.timeout;
        let name = tool_name.to_string();

        let handle = std::thread::Builder::new()
            .name(format!("mcp-call-{tool_name}"))
            .spawn(move || -> Result<Value, BridgeError> {
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()?;
                runtime.block_on(with_timeout(timeout, call_once(&url, &name, payload)))
            })?;

        handle.join().map_err(|_| BridgeError::ToolExecution {
            tool_name: tool_name.to_string(),
            message: "tool call thread panicked".into(),
        })?
    }
}

/// Connect, call, and release. The session is closed on both outcomes.
async fn call_once(url: &str, name: &str, payload: ToolPayload) -> Result<Value, BridgeError> {
    tracing::debug!(tool = name, url, "Calling MCP tool");
    let mut transport = StreamableHttpTransport::new(url);
    let client = MCPClient::connect(&mut transport).await?;
    let result = client.call_tool(name, payload).await;
    client.close().await;
    Ok(result?.into_value_or_text())
}
