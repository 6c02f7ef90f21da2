//! Process-wide configuration, built once at startup and passed explicitly.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// Default run-protocol base URL used by the client.
pub const DEFAULT_RUN_URL: &str = "http://127.0.0.1:8002";
/// Default tool-protocol (MCP) endpoint.
pub const DEFAULT_TOOL_URL: &str = "http://localhost:8000/mcp/";
/// Default reasoning model.
pub const DEFAULT_REASONING_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8002;

/// Upper bounds for every outbound call the bridge makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeTimeouts {
    /// Agent discovery (`GET /agents`).
    pub discovery: Duration,
    /// Primary run submission.
    pub run: Duration,
    /// Raw fallback run submission.
    pub fallback: Duration,
    /// One tool invocation through the bridge, connect to release.
    pub tool: Duration,
    /// One reasoning-provider HTTP request.
    pub reasoning: Duration,
}

impl Default for BridgeTimeouts {
    fn default() -> Self {
        Self {
            discovery: Duration::from_secs(5),
            run: Duration::from_secs(120),
            fallback: Duration::from_secs(10),
            tool: Duration::from_secs(60),
            reasoning: Duration::from_secs(120),
        }
    }
}

/// Configuration for the bridge.
///
/// Resolution order: explicit `with_*` setters, then environment variables
/// (a `.env` file is loaded first when present), then built-in defaults.
/// Nothing here is mutated after startup.
#[derive(Clone)]
pub struct BridgeConfig {
    run_url: String,
    tool_url: String,
    host: String,
    port: u16,
    reasoning_model: String,
    api_keys: HashMap<String, String>,
    base_urls: HashMap<String, String>,
    timeouts: BridgeTimeouts,
}

impl fmt::Debug for BridgeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeConfig")
            .field("run_url", &self.run_url)
            .field("tool_url", &self.tool_url)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("reasoning_model", &self.reasoning_model)
            .field("api_keys", &self.api_keys.keys().collect::<Vec<_>>())
            .field("base_urls", &self.base_urls)
            .field("timeouts", &self.timeouts)
            .finish()
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl BridgeConfig {
    /// Defaults only; no environment access.
    pub fn new() -> Self {
        Self {
            run_url: DEFAULT_RUN_URL.to_string(),
            tool_url: DEFAULT_TOOL_URL.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            reasoning_model: DEFAULT_REASONING_MODEL.to_string(),
            api_keys: HashMap::new(),
            base_urls: HashMap::new(),
            timeouts: BridgeTimeouts::default(),
        }
    }

    /// Load from environment variables (ACP_URL, MCP_SERVER_URL, OPENAI_API_KEY, etc.).
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. `from_env` uses the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::new();

        if let Some(url) = lookup("ACP_URL") {
            config.run_url = url;
        }
        if let Some(url) = lookup("MCP_SERVER_URL") {
            config.tool_url = url;
        }
        if let Some(host) = lookup("ACP_HOST") {
            config.host = host;
        }
        match lookup("ACP_PORT").map(|raw| raw.parse::<u16>()) {
            Some(Ok(port)) => config.port = port,
            Some(Err(e)) => tracing::warn!(error = %e, "Ignoring invalid ACP_PORT"),
            None => {}
        }
        if let Some(model) = lookup("BRIDGE_REASONING_MODEL") {
            config.reasoning_model = model;
        }

        let env_mappings = [("OPENAI_API_KEY", "openai")];
        for (env_var, provider) in &env_mappings {
            if let Some(key) = lookup(env_var).filter(|k| !k.trim().is_empty()) {
                config.api_keys.insert(provider.to_string(), key);
            }
        }

        let url_mappings = [("OPENAI_BASE_URL", "openai")];
        for (env_var, provider) in &url_mappings {
            if let Some(url) = lookup(env_var) {
                config.base_urls.insert(provider.to_string(), url);
            }
        }

        config
    }

    pub fn with_run_url(mut self, url: impl Into<String>) -> Self {
        self.run_url = url.into();
        self
    }

    pub fn with_tool_url(mut self, url: impl Into<String>) -> Self {
        self.tool_url = url.into();
        self
    }

    pub fn with_bind(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = host.into();
        self.port = port;
        self
    }

    pub fn with_reasoning_model(mut self, model: impl Into<String>) -> Self {
        self.reasoning_model = model.into();
        self
    }

    pub fn with_api_key(mut self, provider: &str, key: impl Into<String>) -> Self {
        self.api_keys.insert(provider.to_string(), key.into());
        self
    }

    pub fn with_base_url(mut self, provider: &str, url: impl Into<String>) -> Self {
        self.base_urls.insert(provider.to_string(), url.into());
        self
    }

    pub fn with_timeouts(mut self, timeouts: BridgeTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn run_url(&self) -> &str {
        &self.run_url
    }

    pub fn tool_url(&self) -> &str {
        &self.tool_url
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// `host:port` the run server binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn reasoning_model(&self) -> &str {
        &self.reasoning_model
    }

    pub fn get_api_key(&self, provider: &str) -> Option<&str> {
        self.api_keys.get(provider).map(String::as_str)
    }

    pub fn get_base_url(&self, provider: &str) -> Option<&str> {
        self.base_urls.get(provider).map(String::as_str)
    }

    /// Check if a provider has credentials configured.
    pub fn has_credentials(&self, provider: &str) -> bool {
        self.get_api_key(provider).is_some()
    }

    pub fn timeouts(&self) -> &BridgeTimeouts {
        &self.timeouts
    }
}
