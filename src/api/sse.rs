//! Server-Sent Events support

use super::types::SessionSnapshot;
use crate::runtime::SseEvent;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

/// Convert a session broadcast into an SSE stream, prefixed with a
/// snapshot of the current state.
pub fn sse_stream(
    snapshot: SessionSnapshot,
    broadcast_rx: tokio::sync::broadcast::Receiver<SseEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let init = futures::stream::once(async move {
        let data = json!({
            "type": "init",
            "session": serde_json::to_value(&snapshot).unwrap_or(Value::Null)
        });
        Ok(Event::default().event("init").data(data.to_string()))
    });

    let broadcasts = BroadcastStream::new(broadcast_rx).filter_map(|result| match result {
        Ok(event) => Some(Ok(sse_event_to_axum(&event))),
        Err(_) => None, // Skip lagged messages
    });

    let combined = init.chain(broadcasts);

    Sse::new(combined).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

fn sse_event_to_axum(event: &SseEvent) -> Event {
    let event_type = match event {
        SseEvent::Results { .. } => "results",
        SseEvent::LeafletLoaded { .. } => "leaflet_loaded",
        SseEvent::LeafletUnavailable { .. } => "leaflet_unavailable",
        SseEvent::Message { .. } => "message",
        SseEvent::Delta { .. } => "delta",
        SseEvent::TurnFailed { .. } => "turn_failed",
        SseEvent::TranscriptCleared => "transcript_cleared",
    };

    let data = serde_json::to_value(event).unwrap_or(Value::Null);
    Event::default().event(event_type).data(data.to_string())
}
