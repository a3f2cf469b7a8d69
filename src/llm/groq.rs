//! Groq (OpenAI-compatible) streaming chat provider

use super::types::{ChatMessage, ChatRequest};
use super::{ChatService, LlmError, TurnStream};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

/// Groq chat completions service.
pub struct GroqService {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GroqService {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        // No overall request timeout here: a streamed completion is
        // open-ended and the caller enforces the turn deadline.
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn translate_request(&self, request: &ChatRequest) -> GroqRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        messages.push(ChatMessage::system(request.system.clone()));
        messages.extend(request.messages.iter().cloned());

        GroqRequest {
            model: self.model.clone(),
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: true,
        }
    }
}

#[async_trait]
impl ChatService for GroqService {
    async fn stream_chat(&self, request: &ChatRequest) -> Result<TurnStream, LlmError> {
        let groq_request = self.translate_request(request);
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&groq_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::network(format!("Request timeout: {e}"))
                } else if e.is_connect() {
                    LlmError::network(format!("Connection failed: {e}"))
                } else {
                    LlmError::unknown(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if let Ok(error_resp) = serde_json::from_str::<GroqErrorResponse>(&body) {
                let message = error_resp.error.message;
                return Err(match status.as_u16() {
                    401 | 403 => LlmError::auth(format!("Authentication failed: {message}")),
                    429 => LlmError::rate_limit(format!("Rate limit exceeded: {message}")),
                    400 => LlmError::invalid_request(format!("Invalid request: {message}")),
                    500..=599 => LlmError::server_error(format!("Server error: {message}")),
                    _ => LlmError::unknown(format!("HTTP {status}: {message}")),
                });
            }
            return Err(LlmError::unknown(format!("HTTP {status} error: {body}")));
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let mut bytes = response.bytes_stream();

        tokio::spawn(async move {
            let mut lines = LineBuffer::new();

            while let Some(chunk) = bytes.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        let _ = tx.send(Err(LlmError::network(format!("Stream broken: {e}"))));
                        return;
                    }
                };

                for line in lines.push(&chunk) {
                    match parse_sse_line(&line) {
                        SsePayload::Fragment(text) => {
                            if tx.send(Ok(text)).is_err() {
                                // Receiver dropped; the turn was abandoned.
                                return;
                            }
                        }
                        SsePayload::Done => return,
                        SsePayload::Ignored => {}
                    }
                }
            }
        });

        Ok(Box::pin(UnboundedReceiverStream::new(rx)))
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

/// Accumulates raw stream chunks and yields complete lines.
///
/// Chunk boundaries respect neither line boundaries nor UTF-8 character
/// boundaries, so bytes are buffered and only complete lines are decoded.
struct LineBuffer {
    buf: Vec<u8>,
}

impl LineBuffer {
    fn new() -> Self {
        Self { buf: Vec::new() }
    }

    fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.buf.drain(..=pos).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            lines.push(String::from_utf8_lossy(&line).into_owned());
        }
        lines
    }
}

enum SsePayload {
    Fragment(String),
    Done,
    Ignored,
}

fn parse_sse_line(line: &str) -> SsePayload {
    let Some(data) = line.strip_prefix("data: ") else {
        // Empty separator lines and ": keep-alive" comments.
        return SsePayload::Ignored;
    };

    let data = data.trim();
    if data == "[DONE]" {
        return SsePayload::Done;
    }

    match serde_json::from_str::<StreamChunk>(data) {
        Ok(chunk) => {
            let content = chunk
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.delta.content)
                .unwrap_or_default();
            if content.is_empty() {
                // Role-announcement and finish_reason chunks carry no text.
                SsePayload::Ignored
            } else {
                SsePayload::Fragment(content)
            }
        }
        Err(e) => {
            tracing::debug!(error = %e, line = %data, "Skipping unparseable stream chunk");
            SsePayload::Ignored
        }
    }
}

// Groq API types

#[derive(Debug, Serialize)]
struct GroqRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    delta: StreamDelta,
}

#[derive(Debug, Deserialize, Default)]
struct StreamDelta {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GroqErrorResponse {
    error: GroqError,
}

#[derive(Debug, Deserialize)]
struct GroqError {
    message: String,
}
