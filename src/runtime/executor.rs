//! Session event dispatch
//!
//! Applies pure transitions, executes the resulting effects against the
//! collaborators, feeds completions back in as events, and broadcasts
//! client-visible changes to SSE subscribers.

use super::traits::{LeafletSource, ProductSearch};
use crate::chat;
use crate::llm::{ChatMessage, ChatService};
use crate::session::{transition, Effect, Notice, Session, SessionEvent, TransitionError};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Events broadcast to a session's SSE subscribers.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SseEvent {
    /// The result set was replaced.
    Results { count: usize },
    /// A leaflet was loaded; chat is grounded.
    LeafletLoaded { registration_id: String },
    /// No leaflet text is available for the selected product.
    LeafletUnavailable { registration_id: String },
    /// A message was committed to the transcript.
    Message { message: ChatMessage },
    /// One streamed fragment of the in-flight assistant reply.
    Delta { text: String },
    /// The chat turn failed; shown in place of an assistant reply.
    TurnFailed { message: String },
    /// The chat history was cleared.
    TranscriptCleared,
}

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Owns one session's state and drives its event loop.
///
/// One instance per session; the caller serializes access so each
/// user-triggered event runs to completion before the next is accepted.
pub struct SessionRuntime {
    session: Session,
    search: Arc<dyn ProductSearch>,
    leaflets: Arc<dyn LeafletSource>,
    chat: Arc<dyn ChatService>,
    events: broadcast::Sender<SseEvent>,
}

impl SessionRuntime {
    pub fn new(
        search: Arc<dyn ProductSearch>,
        leaflets: Arc<dyn LeafletSource>,
        chat: Arc<dyn ChatService>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            session: Session::new(),
            search,
            leaflets,
            chat,
            events,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SseEvent> {
        self.events.subscribe()
    }

    /// Handle one user-triggered event to completion: apply the
    /// transition, execute its effects, and keep going until the queue of
    /// completion events drains.
    ///
    /// Only the initial user event can be rejected; completion events are
    /// accepted by construction.
    pub async fn dispatch(&mut self, event: SessionEvent) -> Result<(), TransitionError> {
        let mut queue = VecDeque::from([event]);

        while let Some(event) = queue.pop_front() {
            let result = transition(&self.session, event)?;
            self.session = result.session;

            for effect in result.effects {
                match effect {
                    Effect::SearchRegistry { query } => {
                        let results = self.search.search(&query).await;
                        queue.push_back(SessionEvent::SearchCompleted { results });
                    }
                    Effect::FetchLeaflet { registration_id } => {
                        let leaflet = self.leaflets.fetch(&registration_id).await;
                        queue.push_back(SessionEvent::LeafletLoaded {
                            registration_id,
                            leaflet,
                        });
                    }
                    Effect::RequestTurn => {
                        let completion = self.run_turn().await;
                        queue.push_back(completion);
                    }
                    Effect::Notify(notice) => self.broadcast(notice),
                }
            }
        }

        Ok(())
    }

    /// Run one grounded chat turn, forwarding fragments as deltas.
    async fn run_turn(&self) -> SessionEvent {
        let Some(leaflet) = self.session.leaflet() else {
            // RequestTurn is only emitted from a grounded session.
            return SessionEvent::TurnFailed {
                message: "no leaflet loaded".to_string(),
            };
        };

        let events = self.events.clone();
        let outcome = chat::run_turn(
            self.chat.as_ref(),
            leaflet,
            self.session.transcript(),
            |fragment| {
                let _ = events.send(SseEvent::Delta {
                    text: fragment.to_string(),
                });
            },
        )
        .await;

        match outcome {
            Ok(text) => SessionEvent::TurnCompleted { text },
            Err(e) => SessionEvent::TurnFailed {
                message: e.to_string(),
            },
        }
    }

    fn broadcast(&self, notice: Notice) {
        let event = match notice {
            Notice::ResultsReady { count } => SseEvent::Results { count },
            Notice::LeafletReady { registration_id } => SseEvent::LeafletLoaded { registration_id },
            Notice::LeafletUnavailable { registration_id } => {
                SseEvent::LeafletUnavailable { registration_id }
            }
            Notice::MessageAppended { message } => SseEvent::Message { message },
            Notice::TurnFailed { message } => SseEvent::TurnFailed { message },
            Notice::TranscriptCleared => SseEvent::TranscriptCleared,
        };
        // No subscribers is fine; events are best-effort.
        let _ = self.events.send(event);
    }
}
