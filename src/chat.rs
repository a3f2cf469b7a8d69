//! Chat turn engine
//!
//! Runs one grounded question/answer turn against the LLM: builds the
//! request from the current leaflet and transcript, consumes the fragment
//! stream in arrival order, and yields the concatenated text exactly once
//! on clean completion. A turn that fails mid-stream commits nothing.

use crate::leaflet::LeafletText;
use crate::llm::{ChatMessage, ChatRequest, ChatService, LlmError};
use crate::prompt;
use futures::StreamExt;
use std::time::{Duration, Instant};
use thiserror::Error;

/// How many trailing transcript messages are sent to the model. Older
/// turns stay visible in the displayed transcript but drop out of the
/// model's context.
pub const HISTORY_WINDOW: usize = 10;

/// Overall deadline for one turn, covering request setup and the whole
/// stream.
pub const TURN_TIMEOUT: Duration = Duration::from_secs(60);

/// Low temperature: factual answers over creative ones.
const TEMPERATURE: f32 = 0.2;

/// A chat turn failure. Surfaced to the user in place of an assistant
/// message; never appended to the transcript.
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("{0}")]
    Llm(#[from] LlmError),
    #[error("chat turn timed out after {}s", TURN_TIMEOUT.as_secs())]
    Timeout,
}

/// Build the outgoing request: grounding instruction plus the most recent
/// [`HISTORY_WINDOW`] transcript messages, oldest first.
pub fn build_turn_request(leaflet: &LeafletText, transcript: &[ChatMessage]) -> ChatRequest {
    let start = transcript.len().saturating_sub(HISTORY_WINDOW);
    ChatRequest {
        system: prompt::grounding_instruction(&leaflet.text),
        messages: transcript[start..].to_vec(),
        temperature: TEMPERATURE,
        max_tokens: None,
    }
}

/// Run one turn. Each fragment is passed to `on_fragment` as it arrives;
/// the full concatenated text is returned only if the stream completes
/// without interruption.
pub async fn run_turn(
    service: &dyn ChatService,
    leaflet: &LeafletText,
    transcript: &[ChatMessage],
    mut on_fragment: impl FnMut(&str),
) -> Result<String, TurnError> {
    let request = build_turn_request(leaflet, transcript);
    let started = Instant::now();

    let outcome = tokio::time::timeout(TURN_TIMEOUT, async {
        let mut stream = service.stream_chat(&request).await?;
        let mut full = String::new();
        while let Some(fragment) = stream.next().await {
            let fragment = fragment?;
            on_fragment(&fragment);
            full.push_str(&fragment);
        }
        Ok::<String, TurnError>(full)
    })
    .await;

    match outcome {
        Ok(Ok(full)) => {
            tracing::info!(
                model = %service.model_id(),
                duration_ms = %started.elapsed().as_millis(),
                chars = full.len(),
                "Chat turn completed"
            );
            Ok(full)
        }
        Ok(Err(e)) => {
            let kind = match &e {
                TurnError::Llm(llm) => format!("{:?}", llm.kind),
                TurnError::Timeout => "Timeout".to_string(),
            };
            tracing::error!(
                model = %service.model_id(),
                duration_ms = %started.elapsed().as_millis(),
                kind = %kind,
                error = %e,
                "Chat turn failed"
            );
            Err(e)
        }
        Err(_) => {
            tracing::error!(model = %service.model_id(), "Chat turn timed out");
            Err(TurnError::Timeout)
        }
    }
}
