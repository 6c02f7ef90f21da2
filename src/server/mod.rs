//! HTTP server exposing registered agents over the run protocol.
//!
//! Endpoints: `GET /ping`, `GET /agents`, `GET /agents/{name}` and
//! `POST /runs` (sync JSON or SSE stream).

pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::agents::AgentRegistry;
use crate::config::BridgeConfig;
use crate::mcp::McpToolBridge;
use crate::reasoning::ToolLoopEngine;
use crate::router::AgentRouter;
use crate::tools::{reasoning_tools, ToolCaller};

pub use error::ServerError;

/// Shared, read-only request state.
#[derive(Clone)]
pub struct AppState {
    pub agents: Arc<AgentRegistry>,
}

/// The run-protocol server.
pub struct RunServer {
    state: AppState,
    bind_address: String,
}

impl RunServer {
    pub fn new(agents: AgentRegistry, bind_address: impl Into<String>) -> Self {
        Self {
            state: AppState {
                agents: Arc::new(agents),
            },
            bind_address: bind_address.into(),
        }
    }

    /// The standard agents wired to the configured tool server and, when a
    /// key is present, the reasoning model.
    pub fn from_config(config: &BridgeConfig) -> crate::error::Result<Self> {
        let caller: Arc<dyn ToolCaller> = Arc::new(McpToolBridge::from_config(config));
        let mut router = AgentRouter::new(Arc::clone(&caller));
        if let Some(engine) = ToolLoopEngine::from_config(config)? {
            router = router.with_reasoning(Arc::new(engine), reasoning_tools(caller));
        }
        let agents = AgentRegistry::with_defaults(router)?;
        Ok(Self::new(agents, config.bind_address()))
    }

    /// Build the router with all routes and middleware.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/ping", get(routes::ping_handler))
            .route("/agents", get(routes::list_agents_handler))
            .route("/agents/{name}", get(routes::get_agent_handler))
            .route("/runs", post(routes::create_run_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    pub fn bind_address(&self) -> &str {
        &self.bind_address
    }

    /// Serve until the process is stopped.
    pub async fn run(self) -> error::Result<()> {
        let listener = TcpListener::bind(&self.bind_address)
            .await
            .map_err(|e| ServerError::Internal(format!("Failed to bind {}: {e}", self.bind_address)))?;
        self.run_on(listener).await
    }

    /// Serve on an already-bound listener.
    pub async fn run_on(self, listener: TcpListener) -> error::Result<()> {
        let router = self.router();
        let addr = listener
            .local_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| self.bind_address.clone());
        info!(address = %addr, agents = ?self.state.agents.names(), "Starting run server");

        axum::serve(listener, router)
            .await
            .map_err(|e| ServerError::Internal(format!("Server error: {e}")))
    }
}
