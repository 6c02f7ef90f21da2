//! Model Context Protocol (MCP) client and the synchronous tool bridge.

pub mod bridge;
pub mod client;
pub mod transport;

pub use bridge::McpToolBridge;
pub use client::{MCPClient, MCPToolCallResult};
pub use transport::{MCPTransport, StreamableHttpTransport};
