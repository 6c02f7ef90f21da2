//! Run-protocol endpoints.

use std::convert::Infallible;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    Json,
};
use futures::{Stream, StreamExt};
use serde::Serialize;

use crate::router::ChunkStream;
use crate::types::{AgentList, AgentManifest, MessagePart, Run, RunCreateRequest, RunMode};

use super::error::{Result, ServerError};
use super::AppState;

/// `message.part` event payload.
#[derive(Debug, Serialize)]
struct PartEvent<'a> {
    run_id: uuid::Uuid,
    part: &'a MessagePart,
}

pub async fn ping_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({}))
}

pub async fn list_agents_handler(State(state): State<AppState>) -> Json<AgentList> {
    Json(AgentList {
        agents: state.agents.manifests(),
    })
}

pub async fn get_agent_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<AgentManifest>> {
    state
        .agents
        .get(&name)
        .map(|agent| Json(agent.manifest()))
        .ok_or_else(|| ServerError::NotFound(format!("Agent {name} not found")))
}

/// `POST /runs`: run an agent to completion, or stream its chunks.
pub async fn create_run_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RunCreateRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(request) = payload?;
    let agent = state
        .agents
        .get(&request.agent)
        .ok_or_else(|| ServerError::NotFound(format!("Agent {} not found", request.agent)))?;

    tracing::debug!(agent = %request.agent, mode = %request.mode, messages = request.input.len(), "Run requested");
    let run = Run::created(agent.name());
    let chunks = agent.run(&request.input);

    match request.mode {
        RunMode::Sync => {
            let output: Vec<String> = chunks.collect().await;
            let run = run.complete(output);
            tracing::info!(run_id = %run.run_id, agent = %run.agent_name, "Run completed");
            Ok(Json(run).into_response())
        }
        RunMode::Stream => Ok(Sse::new(run_events(run, chunks))
            .keep_alive(KeepAlive::default())
            .into_response()),
    }
}

fn run_events(
    run: Run,
    chunks: ChunkStream,
) -> impl Stream<Item = std::result::Result<Event, Infallible>> {
    async_stream::stream! {
        yield Ok(json_event("run.created", &run));

        let mut collected = Vec::new();
        let mut chunks = chunks;
        while let Some(chunk) = chunks.next().await {
            let part = MessagePart::text(chunk.clone());
            yield Ok(json_event("message.part", &PartEvent { run_id: run.run_id, part: &part }));
            collected.push(chunk);
        }

        let run = run.complete(collected);
        tracing::info!(run_id = %run.run_id, agent = %run.agent_name, "Streamed run completed");
        yield Ok(json_event("run.completed", &run));
    }
}

fn json_event(name: &str, data: &impl Serialize) -> Event {
    Event::default()
        .event(name)
        .json_data(data)
        .unwrap_or_else(|_| Event::default().event(name))
}
