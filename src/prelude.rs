//! Convenience re-exports for common use.

pub use crate::agents::{AgentRegistry, RunAgent};
pub use crate::client::RunClient;
pub use crate::config::{BridgeConfig, BridgeTimeouts};
pub use crate::error::{BridgeError, Result};
pub use crate::normalize::{normalize_output, OutputItem};
pub use crate::reasoning::{ReasoningEngine, ToolLoopEngine};
pub use crate::router::{plan_routes, AgentRouter, ChunkStream, RouteStep};
pub use crate::tools::{AgentTool, Tool, ToolCaller, ToolKind, ToolPayload};
pub use crate::types::{AgentManifest, Message, MessagePart, Run, RunStatus};

#[cfg(feature = "mcp")]
pub use crate::mcp::McpToolBridge;
