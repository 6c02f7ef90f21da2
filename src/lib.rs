//! agent-bridge: connects run-oriented agent servers (ACP) to tool servers (MCP).
//!
//! The server side exposes named agents whose requests are routed, by a
//! fixed heuristic, to tools on an MCP server, to a reasoning model, or
//! back to the caller as an echo. The client side talks to any ACP server,
//! tolerating the two run schemas found in the wild and normalizing
//! whatever output shape comes back.
//!
//! # Quick Start
//!
//! ```no_run
//! use agent_bridge::prelude::*;
//!
//! # async fn example() -> agent_bridge::error::Result<()> {
//! let config = BridgeConfig::from_env();
//! let client = RunClient::new(&config)?;
//! if let Some(agent) = client.choose_default_agent().await {
//!     let chunks = client.run_normalized(&agent, Some("What is NVDA trading at?")).await?;
//!     println!("{}", chunks.concat());
//! }
//! # Ok(())
//! # }
//! ```

pub mod agents;
pub mod client;
pub mod config;
pub mod error;
pub mod generation;
pub mod normalize;
pub mod prelude;
pub mod provider;
pub mod reasoning;
pub mod router;
pub mod tools;
pub mod types;
pub mod util;

#[cfg(feature = "mcp")]
pub mod mcp;

#[cfg(feature = "server")]
pub mod server;

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(any(feature = "cli", feature = "server"))]
pub mod logging;
