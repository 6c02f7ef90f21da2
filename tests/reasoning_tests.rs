//! Tool-loop reasoning, against a mock provider and a mocked chat API.

mod common;

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use agent_bridge::config::BridgeConfig;
use agent_bridge::error::BridgeError;
use agent_bridge::generation::generate_text;
use agent_bridge::provider::OpenAiProvider;
use agent_bridge::reasoning::{ReasoningEngine, ToolLoopEngine};
use agent_bridge::tools::{reasoning_tools, ToolCaller};
use agent_bridge::types::{ChatTurn, GenerationSettings};

use common::{MockProvider, ScriptedToolCaller};

#[tokio::test]
async fn tool_result_is_fed_back_before_final_answer() {
    let provider = MockProvider::new();
    provider.queue_tool_call("call_1", "yahoo_finance_tool", json!({"ticker": "NVDA"}));
    provider.queue_response("NVDA last traded at 131.2.");

    let caller = Arc::new(ScriptedToolCaller::new().ok("yahoo_finance_tool", json!(131.2)));
    let tools = reasoning_tools(caller.clone());

    let result = generate_text(
        &provider,
        vec![ChatTurn::user("how is nvidia doing")],
        GenerationSettings::default(),
        &tools,
    )
    .await
    .unwrap();

    assert_eq!(result.text, "NVDA last traded at 131.2.");
    assert_eq!(result.steps, 2);
    assert_eq!(result.usage.total_tokens, 45);
    assert_eq!(caller.call_names(), vec!["yahoo_finance_tool"]);

    let requests = provider.requests.lock().unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].tools.len(), 3);
    assert!(matches!(
        requests[1].turns.last(),
        Some(ChatTurn::Tool(outcome)) if outcome.value == json!(131.2) && !outcome.is_error
    ));
}

#[tokio::test]
async fn failing_tool_is_reported_to_the_model() {
    let provider = MockProvider::new();
    provider.queue_tool_call("call_1", "web_crawl_tool", json!({"query": "rust"}));
    provider.queue_response("I could not crawl right now.");

    let caller = Arc::new(ScriptedToolCaller::new().fail("web_crawl_tool", "crawler offline"));
    let tools = reasoning_tools(caller);

    let result = generate_text(
        &provider,
        vec![ChatTurn::user("crawl the rust site")],
        GenerationSettings::default(),
        &tools,
    )
    .await
    .unwrap();
    assert_eq!(result.text, "I could not crawl right now.");

    let requests = provider.requests.lock().unwrap();
    let Some(ChatTurn::Tool(outcome)) = requests[1].turns.last() else {
        panic!("expected a tool outcome");
    };
    assert!(outcome.is_error);
    assert!(outcome.value["error"].as_str().unwrap().contains("crawler offline"));
}

#[tokio::test]
async fn unknown_tool_does_not_abort_the_loop() {
    let provider = MockProvider::new();
    provider.queue_tool_call("call_1", "embedder_tool", json!({"text": "x"}));
    provider.queue_response("done");

    let result = generate_text(
        &provider,
        vec![ChatTurn::user("embed x")],
        GenerationSettings::default(),
        &[],
    )
    .await
    .unwrap();
    assert_eq!(result.text, "done");
}

fn openai_engine(server: &MockServer) -> ToolLoopEngine {
    let config = BridgeConfig::new()
        .with_api_key("openai", "sk-test")
        .with_base_url("openai", server.uri())
        .with_reasoning_model("gpt-4o-mini");
    let provider = OpenAiProvider::from_config(&config).unwrap();
    ToolLoopEngine::new(Arc::new(provider))
}

fn chat_reply(message: Value, finish_reason: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{ "message": message, "finish_reason": finish_reason }],
        "usage": { "prompt_tokens": 12, "completion_tokens": 4, "total_tokens": 16 }
    }))
}

#[tokio::test]
async fn openai_engine_runs_the_tool_loop() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "messages": [{ "role": "system" }, { "role": "user" }, { "role": "assistant" }, { "role": "tool", "tool_call_id": "call_1" }]
        })))
        .respond_with(chat_reply(json!({ "content": "Hello to Ada was sent." }), "stop"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({ "model": "gpt-4o-mini", "temperature": 0.0 })))
        .respond_with(chat_reply(
            json!({
                "content": null,
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": { "name": "hello_tool", "arguments": "{\"name\":\"Ada\"}" }
                }]
            }),
            "tool_calls",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let caller: Arc<dyn ToolCaller> =
        Arc::new(ScriptedToolCaller::new().ok("hello_tool", json!("Hello, Ada!")));
    let answer = openai_engine(&server)
        .answer("say hi to Ada", &reasoning_tools(caller))
        .await
        .unwrap();
    assert_eq!(answer, "Hello to Ada was sent.");
}

#[tokio::test]
async fn openai_error_status_is_an_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "message": "Incorrect API key provided" }
        })))
        .mount(&server)
        .await;

    let err = openai_engine(&server).answer("hi", &[]).await.unwrap_err();
    assert!(matches!(
        err,
        BridgeError::Api { status: 401, ref message } if message.contains("Incorrect API key")
    ));
}

#[tokio::test]
async fn empty_answer_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(chat_reply(json!({ "content": "  " }), "stop"))
        .mount(&server)
        .await;

    let err = openai_engine(&server).answer("hi", &[]).await.unwrap_err();
    assert!(matches!(err, BridgeError::Provider { .. }));
}
