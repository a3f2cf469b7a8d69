//! LLM provider abstraction
//!
//! Provides a common interface for streamed chat completions.

mod error;
mod groq;
mod types;

pub use error::{LlmError, LlmErrorKind};
pub use groq::GroqService;
pub use types::{ChatMessage, ChatRequest, Role};

use async_trait::async_trait;
use futures::stream::Stream;
use std::pin::Pin;

/// Ordered, finite sequence of streamed text fragments. Not restartable:
/// once an item has been consumed it is gone, and a mid-stream error ends
/// the sequence.
pub type TurnStream = Pin<Box<dyn Stream<Item = Result<String, LlmError>> + Send>>;

/// Common interface for streamed chat completion providers
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Open a streamed chat completion. Fragments are yielded in arrival
    /// order; the stream ends after the terminal marker or on error.
    async fn stream_chat(&self, request: &ChatRequest) -> Result<TurnStream, LlmError>;

    /// Get the model ID
    fn model_id(&self) -> &str;
}
