//! Scoped MCP client: connect, call one tool, release.

use rmcp::{
    model::{
        CallToolRequestParams, CallToolResult, Content, JsonObject, ProtocolVersion,
        ResourceContents,
    },
    service::{ClientInitializeError, ServiceError},
};
use serde_json::Value;

use crate::error::BridgeError;

use super::transport::{MCPRunningService, MCPTransport};

/// Result of one `tools/call`, split by content kind.
#[derive(Debug, Clone)]
pub struct MCPToolCallResult {
    pub structured_content: Option<Value>,
    pub text_content: Option<String>,
    pub content: Vec<Value>,
}

impl MCPToolCallResult {
    /// The tool's `data`: structured content, else joined text, else raw content.
    ///
    /// Servers wrap scalar returns as `{"result": x}`; that wrapper is removed.
    pub fn into_value_or_text(self) -> Value {
        if let Some(structured) = self.structured_content {
            return unwrap_result_wrapper(structured);
        }
        if let Some(text) = self.text_content {
            return Value::String(text);
        }
        Value::Array(self.content)
    }
}

fn unwrap_result_wrapper(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.len() == 1 && map.contains_key("result") => {
            map.remove("result").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// One initialized MCP session.
pub struct MCPClient {
    session: MCPRunningService,
}

impl MCPClient {
    /// Connect and initialize, retrying once with the 2024-11-05 protocol
    /// version when the server rejects the latest one.
    pub async fn connect(transport: &mut dyn MCPTransport) -> Result<Self, BridgeError> {
        let latest_client_info = rmcp::model::ClientInfo {
            protocol_version: ProtocolVersion::LATEST,
            ..Default::default()
        };

        match transport.connect(latest_client_info).await {
            Ok(session) => return Ok(Self { session }),
            Err(error) if should_retry_protocol_fallback(&error) => {
                tracing::debug!(error = %error, "MCP server rejected latest protocol version, retrying");
            }
            Err(error) => return Err(map_client_initialize_error(error)),
        }

        let fallback_client_info = rmcp::model::ClientInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            ..Default::default()
        };
        let session = transport
            .connect(fallback_client_info)
            .await
            .map_err(map_client_initialize_error)?;
        Ok(Self { session })
    }

    /// Execute a tool on the MCP server.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: JsonObject,
    ) -> Result<MCPToolCallResult, BridgeError> {
        let result = self
            .session
            .call_tool(CallToolRequestParams {
                meta: None,
                name: name.to_owned().into(),
                arguments: Some(arguments),
                task: None,
            })
            .await
            .map_err(|e| map_service_error("call_tool", e))?;

        map_call_result(name, result)
    }

    /// Release the session. Failure to shut down cleanly is only logged.
    pub async fn close(self) {
        if let Err(error) = self.session.cancel().await {
            tracing::warn!(error = %error, "MCP session did not shut down cleanly");
        }
    }
}

fn should_retry_protocol_fallback(error: &ClientInitializeError) -> bool {
    match error {
        ClientInitializeError::JsonRpcError(error) => {
            let message = error.message.to_ascii_lowercase();
            message.contains("protocol") && message.contains("version")
        }
        _ => false,
    }
}

/// Text items and text resources, one per line.
fn extract_text_content(content: &[Content]) -> Option<String> {
    let lines: Vec<&str> = content
        .iter()
        .filter_map(|item| {
            if let Some(text) = item.as_text() {
                return Some(text.text.as_str());
            }
            match &item.as_resource()?.resource {
                ResourceContents::TextResourceContents { text, .. } => Some(text.as_str()),
                _ => None,
            }
        })
        .collect();
    (!lines.is_empty()).then(|| lines.join("\n"))
}

fn map_call_result(name: &str, result: CallToolResult) -> Result<MCPToolCallResult, BridgeError> {
    let text_content = extract_text_content(&result.content);

    if result.is_error == Some(true) {
        let message = text_content
            .or_else(|| result.structured_content.map(|v| v.to_string()))
            .unwrap_or_else(|| "tool reported an error".into());
        return Err(BridgeError::ToolExecution {
            tool_name: name.to_string(),
            message,
        });
    }

    let content = result
        .content
        .iter()
        .filter_map(|item| serde_json::to_value(item).ok())
        .collect();
    Ok(MCPToolCallResult {
        structured_content: result.structured_content,
        text_content,
        content,
    })
}

fn mcp_provider_error(message: String) -> BridgeError {
    BridgeError::Provider {
        provider: "mcp".into(),
        message,
    }
}

/// Transport-level failures become `Stream`, server answers become `Provider`.
fn map_client_initialize_error(error: ClientInitializeError) -> BridgeError {
    match error {
        ClientInitializeError::JsonRpcError(rpc) => mcp_provider_error(format!(
            "initialize rejected ({}): {}",
            rpc.code.0, rpc.message
        )),
        ClientInitializeError::ConnectionClosed(_)
        | ClientInitializeError::TransportError { .. }
        | ClientInitializeError::Cancelled => BridgeError::Stream(format!("initialize failed: {error}")),
        other => mcp_provider_error(format!("initialize failed: {other}")),
    }
}

fn map_service_error(operation: &str, error: ServiceError) -> BridgeError {
    match error {
        ServiceError::Timeout { timeout } => BridgeError::Timeout(timeout.as_millis() as u64),
        ServiceError::McpError(rpc) => {
            mcp_provider_error(format!("{operation} rejected ({}): {}", rpc.code.0, rpc.message))
        }
        ServiceError::TransportSend(_) | ServiceError::TransportClosed | ServiceError::Cancelled { .. } => {
            BridgeError::Stream(format!("{operation} failed: {error}"))
        }
        other => mcp_provider_error(format!("{operation} failed: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    fn call_result(raw: Value) -> CallToolResult {
        serde_json::from_value(raw).expect("fixture call result should deserialize")
    }

    #[test]
    fn structured_content_wins_and_result_wrapper_is_removed() {
        let mapped = map_call_result(
            "yahoo_finance_tool",
            call_result(json!({
                "content": [{ "type": "text", "text": "{\"result\": 131.2}" }],
                "structuredContent": { "result": 131.2 }
            })),
        )
        .unwrap();
        assert_eq!(mapped.into_value_or_text(), json!(131.2));
    }

    #[test]
    fn multi_key_structured_content_is_kept_whole() {
        let mapped = map_call_result(
            "yahoo_finance_tool",
            call_result(json!({
                "content": [],
                "structuredContent": { "result": 1, "currency": "USD" }
            })),
        )
        .unwrap();
        assert_eq!(
            mapped.into_value_or_text(),
            json!({ "result": 1, "currency": "USD" })
        );
    }

    #[test]
    fn text_content_is_joined_when_unstructured() {
        let mapped = map_call_result(
            "hello_tool",
            call_result(json!({
                "content": [
                    { "type": "text", "text": "Hello," },
                    { "type": "text", "text": "Ada!" }
                ]
            })),
        )
        .unwrap();
        assert_eq!(mapped.into_value_or_text(), json!("Hello,\nAda!"));
    }

    #[test]
    fn raw_content_is_the_last_resort() {
        let mapped = map_call_result(
            "embedder_tool",
            call_result(json!({
                "content": [{ "type": "image", "data": "AAAA", "mimeType": "image/png" }]
            })),
        )
        .unwrap();
        let value = mapped.into_value_or_text();
        assert_eq!(value.as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn error_result_maps_to_tool_execution_error() {
        let err = map_call_result(
            "web_crawl_tool",
            call_result(json!({
                "content": [{ "type": "text", "text": "crawler offline" }],
                "isError": true
            })),
        )
        .expect_err("error result should map to tool execution error");
        assert!(matches!(
            err,
            BridgeError::ToolExecution { tool_name, message }
            if tool_name == "web_crawl_tool" && message == "crawler offline"
        ));
    }

    #[test]
    fn protocol_version_rejection_is_retried() {
        let rejected = ClientInitializeError::JsonRpcError(
            rmcp::model::ErrorData::invalid_request("Unsupported protocol version", None),
        );
        let other = ClientInitializeError::JsonRpcError(rmcp::model::ErrorData::invalid_request(
            "bad initialize payload",
            None,
        ));
        assert!(should_retry_protocol_fallback(&rejected));
        assert!(!should_retry_protocol_fallback(&other));
        assert!(!should_retry_protocol_fallback(&ClientInitializeError::Cancelled));
    }

    #[test]
    fn initialize_jsonrpc_error_maps_to_provider_error() {
        let err = map_client_initialize_error(ClientInitializeError::JsonRpcError(
            rmcp::model::ErrorData::invalid_request("bad initialize payload", None),
        ));
        assert!(matches!(
            err,
            BridgeError::Provider { provider, message }
            if provider == "mcp" && message.contains("bad initialize payload")
        ));
    }

    #[test]
    fn service_timeout_maps_to_timeout_error() {
        let err = map_service_error(
            "call_tool",
            ServiceError::Timeout {
                timeout: Duration::from_millis(2750),
            },
        );
        assert!(matches!(err, BridgeError::Timeout(2750)));
    }

    #[test]
    fn cancelled_call_is_a_stream_error() {
        let err = map_service_error(
            "call_tool",
            ServiceError::Cancelled {
                reason: Some("client cancelled".into()),
            },
        );
        assert!(matches!(
            err,
            BridgeError::Stream(message) if message.starts_with("call_tool failed")
        ));
    }
}
