//! Effects produced by state transitions

use crate::llm::ChatMessage;

/// Effects to be executed after a state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Run a registry search for `query`.
    SearchRegistry { query: String },

    /// Fetch the leaflet for a registration id.
    FetchLeaflet { registration_id: String },

    /// Run a grounded chat turn against the current leaflet + transcript.
    RequestTurn,

    /// Notify the session's client of a visible change.
    Notify(Notice),
}

/// Client-visible notifications emitted by transitions.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// A search finished and the result set was replaced.
    ResultsReady { count: usize },
    /// A leaflet was loaded; chat is now grounded in it.
    LeafletReady { registration_id: String },
    /// No leaflet text is available for this product.
    LeafletUnavailable { registration_id: String },
    /// A message was committed to the transcript.
    MessageAppended { message: ChatMessage },
    /// The chat turn failed; shown in place of an assistant reply.
    TurnFailed { message: String },
    /// The chat history was cleared.
    TranscriptCleared,
}
