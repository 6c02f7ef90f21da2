//! Named agents served over the run protocol.

use std::sync::Arc;

use futures::StreamExt;

use crate::error::BridgeError;
use crate::router::{AgentRouter, ChunkStream};
use crate::types::{extract_text, AgentManifest, Message};

pub const ROUTER_AGENT_NAME: &str = "agent";
pub const DATE_AGENT_NAME: &str = "dateAgent";

/// A stateless handler addressed by name.
pub trait RunAgent: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> Option<&str> {
        None
    }

    /// Start a run. The returned stream is lazy and consumed once.
    fn run(&self, input: &[Message]) -> ChunkStream;

    fn manifest(&self) -> AgentManifest {
        AgentManifest {
            name: self.name().to_string(),
            description: self.description().map(str::to_string),
        }
    }
}

/// General agent: routes the input text to tools, reasoning, or an echo.
pub struct RouterAgent {
    router: AgentRouter,
}

impl RouterAgent {
    pub fn new(router: AgentRouter) -> Self {
        Self { router }
    }
}

impl RunAgent for RouterAgent {
    fn name(&self) -> &str {
        ROUTER_AGENT_NAME
    }

    fn description(&self) -> Option<&str> {
        Some(
            "Answers ticker questions, greetings and 'crawl:' requests with tools; \
             anything else goes to the reasoning model, or is echoed back.",
        )
    }

    fn run(&self, input: &[Message]) -> ChunkStream {
        self.router.route(&extract_text(input))
    }
}

/// Replies with today's local date, ignoring its input.
#[derive(Debug, Default)]
pub struct DateAgent;

impl RunAgent for DateAgent {
    fn name(&self) -> &str {
        DATE_AGENT_NAME
    }

    fn description(&self) -> Option<&str> {
        Some("Returns the current date in YYYY-MM-DD.")
    }

    fn run(&self, _input: &[Message]) -> ChunkStream {
        futures::stream::once(async {
            format!("Current date is: {}", chrono::Local::now().format("%Y-%m-%d"))
        })
        .boxed()
    }
}

/// Agents by name, in registration order.
#[derive(Default, Clone)]
pub struct AgentRegistry {
    agents: Vec<Arc<dyn RunAgent>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard agent set: the router agent and the date agent.
    pub fn with_defaults(router: AgentRouter) -> Result<Self, BridgeError> {
        let mut registry = Self::new();
        registry.register(Arc::new(RouterAgent::new(router)))?;
        registry.register(Arc::new(DateAgent))?;
        Ok(registry)
    }

    /// Add an agent. Names must be unique.
    pub fn register(&mut self, agent: Arc<dyn RunAgent>) -> Result<(), BridgeError> {
        if self.get(agent.name()).is_some() {
            return Err(BridgeError::InvalidArgument(format!(
                "Agent '{}' is already registered",
                agent.name()
            )));
        }
        tracing::debug!(agent = agent.name(), "Registered agent");
        self.agents.push(agent);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn RunAgent>> {
        self.agents.iter().find(|a| a.name() == name).cloned()
    }

    pub fn names(&self) -> Vec<String> {
        self.agents.iter().map(|a| a.name().to_string()).collect()
    }

    pub fn manifests(&self) -> Vec<AgentManifest> {
        self.agents.iter().map(|a| a.manifest()).collect()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
