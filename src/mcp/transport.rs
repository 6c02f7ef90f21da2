//! MCP transport layer.

use async_trait::async_trait;
use rmcp::model::ClientInfo;
use rmcp::service::{ClientInitializeError, DynService, RoleClient, RunningService};
use rmcp::transport::StreamableHttpClientTransport;
use rmcp::ServiceExt;

pub type DynClientService = Box<dyn DynService<RoleClient>>;
pub type MCPRunningService = RunningService<RoleClient, DynClientService>;

/// Something that can open an initialized MCP session.
#[async_trait]
pub trait MCPTransport: Send {
    /// Connect and run the initialize handshake with the given client info.
    async fn connect(
        &mut self,
        client_info: ClientInfo,
    ) -> Result<MCPRunningService, ClientInitializeError>;
}

/// Streamable-HTTP transport for a remote MCP server.
#[derive(Debug, Clone)]
pub struct StreamableHttpTransport {
    url: String,
}

impl StreamableHttpTransport {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl MCPTransport for StreamableHttpTransport {
    async fn connect(
        &mut self,
        client_info: ClientInfo,
    ) -> Result<MCPRunningService, ClientInitializeError> {
        tracing::debug!(url = %self.url, version = ?client_info.protocol_version, "Connecting to MCP server");
        let transport = StreamableHttpClientTransport::from_uri(self.url.clone());
        client_info.into_dyn().serve(transport).await
    }
}
