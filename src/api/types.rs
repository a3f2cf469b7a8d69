//! API request/response types

use crate::filter::ProductFilter;
use crate::llm::ChatMessage;
use crate::registry::ProductRecord;
use crate::session::{Session, SessionPhase};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
}

/// Full client-facing view of one session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub results: Vec<ProductRecord>,
    pub selected_registration_id: Option<String>,
    pub leaflet_loaded: bool,
    pub transcript: Vec<ChatMessage>,
}

impl SessionSnapshot {
    pub fn of(session: &Session) -> Self {
        Self {
            phase: session.phase(),
            results: session.results().to_vec(),
            selected_registration_id: session.selected_registration_id().map(String::from),
            leaflet_loaded: session.leaflet().is_some(),
            transcript: session.transcript().to_vec(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub count: usize,
}

#[derive(Debug, Deserialize)]
pub struct ResultsQuery {
    #[serde(default)]
    pub filter: ProductFilter,
}

#[derive(Debug, Serialize)]
pub struct ResultsResponse {
    pub results: Vec<ProductRecord>,
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub registration_id: String,
}

#[derive(Debug, Serialize)]
pub struct SelectResponse {
    pub leaflet_loaded: bool,
}

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: ChatMessage,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
