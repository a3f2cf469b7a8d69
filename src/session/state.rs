//! Session aggregate state

use crate::leaflet::LeafletText;
use crate::llm::ChatMessage;
use crate::registry::ProductRecord;
use serde::Serialize;

/// Conceptual phase of a session, derived from the aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// No results, no leaflet, no transcript.
    Idle,
    /// Results present, no leaflet loaded.
    Browsing,
    /// Leaflet loaded; chat is available.
    Grounded,
}

/// Everything one interactive session owns. Created empty, mutated only
/// through [`transition`](super::transition), discarded when the session
/// ends.
///
/// Invariant: the transcript is non-empty only while a leaflet is loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Session {
    pub(super) results: Vec<ProductRecord>,
    pub(super) selected_registration_id: Option<String>,
    pub(super) leaflet: Option<LeafletText>,
    pub(super) transcript: Vec<ChatMessage>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SessionPhase {
        if self.leaflet.is_some() {
            SessionPhase::Grounded
        } else if self.results.is_empty() {
            SessionPhase::Idle
        } else {
            SessionPhase::Browsing
        }
    }

    pub fn results(&self) -> &[ProductRecord] {
        &self.results
    }

    pub fn selected_registration_id(&self) -> Option<&str> {
        self.selected_registration_id.as_deref()
    }

    pub fn leaflet(&self) -> Option<&LeafletText> {
        self.leaflet.as_ref()
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }
}
