//! Official product leaflet retrieval
//!
//! Downloads the leaflet HTML document for a registration id and reduces it
//! to bounded plain text. "No leaflet" and "fetch failed" are deliberately
//! indistinguishable to callers: both come back as `None`, with the cause
//! recorded in the logs.

use crate::cache::BoundedCache;
use reqwest::Client;
use scraper::{Html, Node};
use serde::Serialize;
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;

/// Plain-text leaflet content, keyed by the registration id it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeafletText {
    pub registration_id: String,
    pub text: String,
}

/// Maximum resident leaflet size in characters.
pub const MAX_LEAFLET_CHARS: usize = 15_000;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const CACHE_CAPACITY: usize = 16;

/// Markup with no leaflet content: scripts, styling, page chrome.
const EXCLUDED_TAGS: &[&str] = &["script", "style", "header", "footer", "nav"];

#[derive(Debug, Error)]
enum LeafletError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("leaflet endpoint returned HTTP {0}")]
    Status(reqwest::StatusCode),
}

/// Client for the leaflet document endpoint.
pub struct LeafletClient {
    client: Client,
    base_url: String,
    cache: Mutex<BoundedCache<String, LeafletText>>,
}

impl LeafletClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cache: Mutex::new(BoundedCache::new(CACHE_CAPACITY)),
        }
    }

    /// Fetch and extract the leaflet for `registration_id`.
    ///
    /// Returns `None` on non-success status, network failure, or timeout.
    /// Successful extractions are cached; absent leaflets are not, since
    /// the session's selection pointer already prevents hot retry loops.
    pub async fn fetch(&self, registration_id: &str) -> Option<LeafletText> {
        let key = registration_id.to_string();

        if let Some(hit) = self.cache.lock().expect("cache lock poisoned").get(&key) {
            tracing::debug!(registration_id = %key, "Leaflet cache hit");
            return Some(hit);
        }

        match self.download(&key).await {
            Ok(html) => {
                let leaflet = LeafletText {
                    registration_id: key.clone(),
                    text: extract_text(&html),
                };
                tracing::info!(
                    registration_id = %key,
                    chars = leaflet.text.len(),
                    "Leaflet loaded"
                );
                self.cache
                    .lock()
                    .expect("cache lock poisoned")
                    .insert(key, leaflet.clone());
                Some(leaflet)
            }
            Err(e) => {
                tracing::warn!(registration_id = %key, error = %e, "Leaflet unavailable");
                None
            }
        }
    }

    async fn download(&self, registration_id: &str) -> Result<String, LeafletError> {
        let url = format!(
            "{}/dochtml/p/{id}/P_{id}.html",
            self.base_url,
            id = registration_id
        );

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LeafletError::Status(status));
        }

        Ok(response.text().await?)
    }
}

/// Reduce a leaflet HTML document to visible plain text.
///
/// Text nodes under excluded subtrees are dropped; the rest are trimmed and
/// joined with newlines in document order, preserving paragraph breaks.
/// Output is truncated to [`MAX_LEAFLET_CHARS`] characters.
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut parts: Vec<&str> = Vec::new();

    for node in document.tree.root().descendants() {
        if let Node::Text(text) = node.value() {
            let excluded = node.ancestors().any(|ancestor| match ancestor.value() {
                Node::Element(element) => EXCLUDED_TAGS.contains(&element.name()),
                _ => false,
            });
            if excluded {
                continue;
            }
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                parts.push(trimmed);
            }
        }
    }

    truncate_chars(parts.join("\n"), MAX_LEAFLET_CHARS)
}

/// Truncate to at most `max` characters, respecting char boundaries.
fn truncate_chars(mut text: String, max: usize) -> String {
    if let Some((idx, _)) = text.char_indices().nth(max) {
        text.truncate(idx);
    }
    text
}
