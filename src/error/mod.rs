//! Error types for the bridge.

use thiserror::Error;

/// Primary error type for all bridge operations.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Tool execution error: {tool_name}: {message}")]
    ToolExecution { tool_name: String, message: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Provider error: {provider}: {message}")]
    Provider { provider: String, message: String },

    /// The run server answered, but not in a shape the primary run schema understands.
    #[error("Run protocol error: {0}")]
    Protocol(String),

    #[error("Agent '{name}' not found. Available: {}", format_available(.available))]
    AgentNotFound {
        name: String,
        available: Vec<String>,
    },
}

fn format_available(names: &[String]) -> String {
    if names.is_empty() {
        "<none>".to_string()
    } else {
        names.join(", ")
    }
}

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Timeout,
    Server,
    Api,
    Protocol,
    Configuration,
    Serialization,
    ToolExecution,
    NotFound,
    Unknown,
}

impl BridgeError {
    /// Create an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Network(e) if e.is_decode() => ErrorCategory::Protocol,
            Self::Network(e) if e.is_timeout() => ErrorCategory::Timeout,
            Self::Network(_) | Self::Io(_) | Self::Stream(_) => ErrorCategory::Network,
            Self::Timeout(_) => ErrorCategory::Timeout,
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Serialization(_) => ErrorCategory::Serialization,
            Self::Protocol(_) => ErrorCategory::Protocol,
            Self::Api { status, .. } => match status {
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Api,
            },
            Self::ToolExecution { .. } => ErrorCategory::ToolExecution,
            Self::AgentNotFound { .. } => ErrorCategory::NotFound,
            _ => ErrorCategory::Unknown,
        }
    }

    /// Whether the run server rejected or garbled a request it did receive.
    ///
    /// These are the failures the client answers by retrying once with the
    /// secondary run schema. Transport failures are not protocol errors.
    pub fn is_protocol_error(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Protocol
                | ErrorCategory::Api
                | ErrorCategory::Server
                | ErrorCategory::Serialization
        )
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, BridgeError>;
