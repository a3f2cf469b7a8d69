//! Mock implementations for testing
//!
//! These mocks enable driving the executor without real I/O.

use super::traits::{LeafletSource, ProductSearch};
use crate::leaflet::LeafletText;
use crate::llm::{ChatRequest, ChatService, LlmError, TurnStream};
use crate::registry::ProductRecord;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

// ============================================================================
// Mock Registry
// ============================================================================

/// Mock registry that returns queued result sets
pub struct MockRegistry {
    results: Mutex<VecDeque<Vec<ProductRecord>>>,
    /// Record of all queries made
    pub queries: Mutex<Vec<String>>,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self {
            results: Mutex::new(VecDeque::new()),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Queue a result set for the next search
    pub fn queue_results(&self, results: Vec<ProductRecord>) {
        self.results.lock().unwrap().push_back(results);
    }
}

#[async_trait]
impl ProductSearch for MockRegistry {
    async fn search(&self, name: &str) -> Vec<ProductRecord> {
        self.queries.lock().unwrap().push(name.to_string());
        self.results.lock().unwrap().pop_front().unwrap_or_default()
    }
}

// ============================================================================
// Mock Leaflet Source
// ============================================================================

/// Mock leaflet source with predefined leaflets per registration id
pub struct MockLeafletSource {
    leaflets: HashMap<String, String>,
    /// Record of all ids fetched
    pub fetches: Mutex<Vec<String>>,
}

impl MockLeafletSource {
    pub fn new() -> Self {
        Self {
            leaflets: HashMap::new(),
            fetches: Mutex::new(Vec::new()),
        }
    }

    /// Register a leaflet text for an id; unregistered ids come back absent
    pub fn with_leaflet(mut self, registration_id: impl Into<String>, text: impl Into<String>) -> Self {
        self.leaflets.insert(registration_id.into(), text.into());
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.lock().unwrap().len()
    }
}

#[async_trait]
impl LeafletSource for MockLeafletSource {
    async fn fetch(&self, registration_id: &str) -> Option<LeafletText> {
        self.fetches.lock().unwrap().push(registration_id.to_string());
        self.leaflets
            .get(registration_id)
            .map(|text| LeafletText {
                registration_id: registration_id.to_string(),
                text: text.clone(),
            })
    }
}

// ============================================================================
// Mock Chat Service
// ============================================================================

/// One scripted chat turn: fragments to stream, each Ok or a mid-stream
/// error that ends the sequence.
pub type TurnScript = Vec<Result<String, LlmError>>;

/// Mock chat service that streams queued scripts
pub struct MockChatService {
    scripts: Mutex<VecDeque<Result<TurnScript, LlmError>>>,
    /// Record of all requests made
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl MockChatService {
    pub fn new() -> Self {
        Self {
            scripts: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a turn that streams the given fragments and completes
    pub fn queue_fragments(&self, fragments: &[&str]) {
        let script = fragments.iter().map(|f| Ok((*f).to_string())).collect();
        self.scripts.lock().unwrap().push_back(Ok(script));
    }

    /// Queue a turn that streams some fragments then breaks mid-stream
    pub fn queue_broken_stream(&self, fragments: &[&str], error: LlmError) {
        let mut script: TurnScript = fragments.iter().map(|f| Ok((*f).to_string())).collect();
        script.push(Err(error));
        self.scripts.lock().unwrap().push_back(Ok(script));
    }

    /// Queue a turn that fails before any content is produced
    pub fn queue_error(&self, error: LlmError) {
        self.scripts.lock().unwrap().push_back(Err(error));
    }

    /// Get recorded requests
    pub fn recorded_requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatService for MockChatService {
    async fn stream_chat(&self, request: &ChatRequest) -> Result<TurnStream, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::network("No mock turn queued")))?;
        Ok(Box::pin(futures::stream::iter(script)))
    }

    fn model_id(&self) -> &str {
        "mock-model"
    }
}
