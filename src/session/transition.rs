//! Pure state transition function

use super::{Effect, Notice, Session, SessionEvent};
use crate::llm::ChatMessage;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub session: Session,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("no product with registration id {0} in the current results")]
    UnknownProduct(String),
    #[error("no leaflet is loaded; select a product with an available leaflet first")]
    NotGrounded,
}

/// Pure transition function.
///
/// Given the same session and event, always produces the same new session
/// and effects, with no I/O. The caller owns effect execution and feeds
/// completion events back in.
pub fn transition(
    session: &Session,
    event: SessionEvent,
) -> Result<TransitionResult, TransitionError> {
    match event {
        // A new search always resets everything first: stale leaflet or
        // chat context must never survive into the next result set, even
        // if the user re-selects the same product afterwards.
        SessionEvent::SearchSubmitted { query } => Ok(TransitionResult::new(Session::new())
            .with_effect(Effect::SearchRegistry { query })),

        SessionEvent::SearchCompleted { results } => {
            let mut next = session.clone();
            next.results = results;
            let count = next.results.len();
            Ok(TransitionResult::new(next)
                .with_effect(Effect::Notify(Notice::ResultsReady { count })))
        }

        SessionEvent::ProductSelected { registration_id } => {
            if session.selected_registration_id.as_deref() == Some(registration_id.as_str()) {
                // Repeat selection of the attempted id: no fetch, no reset.
                return Ok(TransitionResult::new(session.clone()));
            }
            if !session
                .results
                .iter()
                .any(|r| r.registration_id == registration_id)
            {
                return Err(TransitionError::UnknownProduct(registration_id));
            }

            let mut next = session.clone();
            next.selected_registration_id = Some(registration_id.clone());
            Ok(TransitionResult::new(next).with_effect(Effect::FetchLeaflet { registration_id }))
        }

        SessionEvent::LeafletLoaded {
            registration_id,
            leaflet,
        } => {
            if session.selected_registration_id.as_deref() != Some(registration_id.as_str()) {
                // Stale completion: the selection pointer moved on.
                return Ok(TransitionResult::new(session.clone()));
            }

            let mut next = session.clone();
            next.transcript.clear();
            let notice = match leaflet {
                Some(leaflet) => {
                    next.leaflet = Some(leaflet);
                    Notice::LeafletReady { registration_id }
                }
                None => {
                    next.leaflet = None;
                    Notice::LeafletUnavailable { registration_id }
                }
            };
            Ok(TransitionResult::new(next).with_effect(Effect::Notify(notice)))
        }

        SessionEvent::ChatSubmitted { text } => {
            if session.leaflet.is_none() {
                return Err(TransitionError::NotGrounded);
            }

            let mut next = session.clone();
            let message = ChatMessage::user(text);
            next.transcript.push(message.clone());
            Ok(TransitionResult::new(next)
                .with_effect(Effect::Notify(Notice::MessageAppended { message }))
                .with_effect(Effect::RequestTurn))
        }

        SessionEvent::TurnCompleted { text } => {
            if session.leaflet.is_none() {
                // A completion can only follow a grounded turn; drop it.
                return Ok(TransitionResult::new(session.clone()));
            }

            let mut next = session.clone();
            let message = ChatMessage::assistant(text);
            next.transcript.push(message.clone());
            Ok(TransitionResult::new(next)
                .with_effect(Effect::Notify(Notice::MessageAppended { message })))
        }

        // The user message that triggered the turn stays in the transcript
        // so the user can retry by resending; no assistant message is
        // committed.
        SessionEvent::TurnFailed { message } => Ok(TransitionResult::new(session.clone())
            .with_effect(Effect::Notify(Notice::TurnFailed { message }))),

        SessionEvent::ChatCleared => {
            let mut next = session.clone();
            next.transcript.clear();
            Ok(TransitionResult::new(next)
                .with_effect(Effect::Notify(Notice::TranscriptCleared)))
        }
    }
}
