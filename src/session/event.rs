//! Events that can occur in a session
//!
//! User-triggered events come from the HTTP surface; completion events are
//! fed back by the runtime after it executes an effect.

use crate::leaflet::LeafletText;
use crate::registry::ProductRecord;

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum SessionEvent {
    // User events
    /// A new search was submitted. Resets the whole session before the
    /// lookup runs.
    SearchSubmitted { query: String },
    /// A product was picked from the current result set.
    ProductSelected { registration_id: String },
    /// A chat message was sent. Only valid while grounded.
    ChatSubmitted { text: String },
    /// The chat history was cleared. Leaflet and selection stay.
    ChatCleared,

    // Completion events
    /// The registry lookup finished (an empty set covers both "no matches"
    /// and a degraded lookup failure).
    SearchCompleted { results: Vec<ProductRecord> },
    /// The leaflet fetch finished; `None` means no leaflet is available.
    LeafletLoaded {
        registration_id: String,
        leaflet: Option<LeafletText>,
    },
    /// The chat turn stream completed cleanly; `text` is the full
    /// concatenated assistant reply.
    TurnCompleted { text: String },
    /// The chat turn failed; nothing is committed to the transcript.
    TurnFailed { message: String },
}
