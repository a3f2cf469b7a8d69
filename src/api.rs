//! HTTP API
//!
//! The UI boundary: user controls arrive as HTTP events, progress and
//! streamed chat output leave over SSE.

mod handlers;
mod sse;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::llm::ChatService;
use crate::runtime::{LeafletSource, ProductSearch, SessionRuntime};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Application state shared across handlers.
///
/// Each session runtime sits behind its own `Mutex`, so one session
/// handles one event at a time while sessions stay independent of each
/// other. The collaborator clients are shared.
#[derive(Clone)]
pub struct AppState {
    sessions: Arc<RwLock<HashMap<String, Arc<Mutex<SessionRuntime>>>>>,
    search: Arc<dyn ProductSearch>,
    leaflets: Arc<dyn LeafletSource>,
    chat: Arc<dyn ChatService>,
}

impl AppState {
    pub fn new(
        search: Arc<dyn ProductSearch>,
        leaflets: Arc<dyn LeafletSource>,
        chat: Arc<dyn ChatService>,
    ) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            search,
            leaflets,
            chat,
        }
    }

    pub(crate) async fn create_session(&self) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        let runtime = SessionRuntime::new(
            self.search.clone(),
            self.leaflets.clone(),
            self.chat.clone(),
        );
        self.sessions
            .write()
            .await
            .insert(id.clone(), Arc::new(Mutex::new(runtime)));
        tracing::info!(session_id = %id, "Session created");
        id
    }

    pub(crate) async fn get_session(&self, id: &str) -> Option<Arc<Mutex<SessionRuntime>>> {
        self.sessions.read().await.get(id).cloned()
    }

    pub(crate) async fn remove_session(&self, id: &str) -> bool {
        let removed = self.sessions.write().await.remove(id).is_some();
        if removed {
            tracing::info!(session_id = %id, "Session ended");
        }
        removed
    }
}
