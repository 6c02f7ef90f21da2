//! Tool calling: the blocking caller seam, the tool catalog, and the tool
//! wrappers offered to the reasoning engine.

pub mod caller;
pub mod catalog;
pub mod tool;
pub mod types;

pub use caller::{call_tool_async, payload, render_value, ToolCaller, ToolPayload};
pub use catalog::ToolKind;
pub use tool::{reasoning_tools, AgentTool, Tool};
pub use types::ToolParameters;
