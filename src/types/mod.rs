//! Core types: run-protocol messages and the reasoning conversation.

pub mod chat;
pub mod generation;
pub mod run;
pub mod usage;

pub use chat::{ChatTurn, ToolCallOutcome, ToolCallRequest};
pub use generation::{FinishReason, GenerationSettings, ToolLoopOutcome};
pub use run::*;
pub use usage::TokenUsage;
