//! Routing behavior against scripted tools and reasoning.

mod common;

use std::sync::Arc;

use futures::StreamExt;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use agent_bridge::agents::{AgentRegistry, RunAgent};
use agent_bridge::router::AgentRouter;
use agent_bridge::tools::{reasoning_tools, ToolCaller};
use agent_bridge::types::{Message, MessagePart};

use common::{ScriptedReasoning, ScriptedToolCaller};

async fn route(router: &AgentRouter, text: &str) -> Vec<String> {
    router.route(text).collect().await
}

#[tokio::test]
async fn ticker_goes_to_finance_tool() {
    let caller = Arc::new(ScriptedToolCaller::new().ok("yahoo_finance_tool", json!(189.5)));
    let router = AgentRouter::new(caller.clone());

    assert_eq!(route(&router, "What is AAPL trading at?").await, vec!["189.5"]);

    let calls = caller.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "yahoo_finance_tool");
    assert_eq!(Value::Object(calls[0].1.clone()), json!({"ticker": "AAPL"}));
}

#[tokio::test]
async fn nvidia_maps_to_nvda() {
    let caller = Arc::new(ScriptedToolCaller::new().ok("yahoo_finance_tool", json!("131.20")));
    let router = AgentRouter::new(caller.clone());

    assert_eq!(route(&router, "how is nvidia doing").await, vec!["131.20"]);
    let calls = caller.calls.lock().unwrap();
    assert_eq!(calls[0].1.get("ticker"), Some(&json!("NVDA")));
}

#[tokio::test]
async fn blank_input_gets_placeholder_without_tool_calls() {
    let caller = Arc::new(ScriptedToolCaller::new());
    let router = AgentRouter::new(caller.clone());

    assert_eq!(route(&router, "   ").await, vec!["(empty input)"]);
    assert!(caller.call_names().is_empty());
}

#[tokio::test]
async fn greeting_defaults_to_there() {
    let caller = Arc::new(ScriptedToolCaller::new().ok("hello_tool", json!("Hello, there!")));
    let router = AgentRouter::new(caller.clone());

    assert_eq!(route(&router, "hello").await, vec!["Hello, there!"]);
    let calls = caller.calls.lock().unwrap();
    assert_eq!(Value::Object(calls[0].1.clone()), json!({"name": "there"}));
}

#[tokio::test]
async fn crawl_query_is_trimmed_and_structured_output_is_json() {
    let caller = Arc::new(
        ScriptedToolCaller::new().ok("web_crawl_tool", json!({"pages": ["https://tokio.rs"]})),
    );
    let router = AgentRouter::new(caller.clone());

    assert_eq!(
        route(&router, "crawl:   tokio runtime  ").await,
        vec![r#"{"pages":["https://tokio.rs"]}"#]
    );
    let calls = caller.calls.lock().unwrap();
    assert_eq!(calls[0].1.get("query"), Some(&json!("tokio runtime")));
}

#[tokio::test]
async fn failed_tool_reports_and_falls_through_to_next_route() {
    let caller = Arc::new(
        ScriptedToolCaller::new()
            .fail("yahoo_finance_tool", "ticker feed down")
            .ok("hello_tool", json!("Hello, IBM fans!")),
    );
    let router = AgentRouter::new(caller.clone());

    let chunks = route(&router, "hello IBM fans").await;
    assert_eq!(chunks.len(), 2);
    assert!(chunks[0].starts_with("[agent] finance tool error:"));
    assert!(chunks[0].contains("ticker feed down"));
    assert_eq!(chunks[1], "Hello, IBM fans!");
    assert_eq!(caller.call_names(), vec!["yahoo_finance_tool", "hello_tool"]);
}

#[tokio::test]
async fn failed_crawl_reports_then_reasoning_answers() {
    let caller: Arc<dyn ToolCaller> =
        Arc::new(ScriptedToolCaller::new().fail("web_crawl_tool", "crawler offline"));
    let reasoning = Arc::new(ScriptedReasoning::answering("Tokio is an async runtime."));
    let router = AgentRouter::new(caller).with_reasoning(reasoning.clone(), Vec::new());

    let chunks = route(&router, "crawl: tokio runtime").await;
    assert_eq!(
        chunks,
        vec![
            "[agent] crawl tool error: Tool execution error: web_crawl_tool: crawler offline".to_string(),
            "Tokio is an async runtime.".to_string(),
        ]
    );
    assert_eq!(reasoning.prompts.lock().unwrap()[0].0, "crawl: tokio runtime");
}

#[tokio::test]
async fn failed_greeting_alone_falls_through_to_echo() {
    let caller = Arc::new(ScriptedToolCaller::new().fail("hello_tool", "greeter down"));
    let router = AgentRouter::new(caller.clone());

    let chunks = route(&router, "hello world").await;
    assert_eq!(
        chunks,
        vec![
            "[agent] greeting tool error: Tool execution error: hello_tool: greeter down".to_string(),
            "agent received: hello world".to_string(),
        ]
    );
    assert_eq!(caller.call_names(), vec!["hello_tool"]);
}

#[tokio::test]
async fn all_failures_without_reasoning_end_in_echo() {
    let caller = Arc::new(ScriptedToolCaller::new());
    let router = AgentRouter::new(caller);

    let chunks = route(&router, "price of MSFT").await;
    assert_eq!(chunks.len(), 2);
    assert!(chunks[0].starts_with("[agent] finance tool error: "));
    assert_eq!(chunks[1], "agent received: price of MSFT");
}

#[tokio::test]
async fn unmatched_text_goes_to_reasoning_with_tools() {
    let caller: Arc<dyn ToolCaller> = Arc::new(ScriptedToolCaller::new());
    let reasoning = Arc::new(ScriptedReasoning::answering("Paris is the capital of France."));
    let router = AgentRouter::new(Arc::clone(&caller))
        .with_reasoning(reasoning.clone(), reasoning_tools(caller));

    assert_eq!(
        route(&router, "  what is the capital of france ").await,
        vec!["Paris is the capital of France."]
    );

    let prompts = reasoning.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert_eq!(prompts[0].0, "what is the capital of france");
    assert_eq!(
        prompts[0].1,
        vec!["web_crawl_tool", "hello_tool", "yahoo_finance_tool"]
    );
}

#[tokio::test]
async fn reasoning_failure_falls_back_to_echo() {
    let caller: Arc<dyn ToolCaller> = Arc::new(ScriptedToolCaller::new());
    let reasoning = Arc::new(ScriptedReasoning::failing("rate limited"));
    let router = AgentRouter::new(caller).with_reasoning(reasoning, Vec::new());

    assert_eq!(route(&router, "tell me a joke").await, vec!["agent received: tell me a joke"]);
}

#[tokio::test]
async fn router_agent_joins_message_text() {
    let caller = Arc::new(ScriptedToolCaller::new());
    let registry = AgentRegistry::with_defaults(AgentRouter::new(caller)).unwrap();
    let agent = registry.get("agent").unwrap();

    let input = vec![
        Message::user(vec![MessagePart::text("good")]),
        Message::user(vec![MessagePart::text("morning")]),
    ];
    let chunks: Vec<String> = agent.run(&input).collect().await;
    assert_eq!(chunks, vec!["agent received: good morning"]);
}
