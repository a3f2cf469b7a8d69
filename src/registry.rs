//! Drug registry client
//!
//! Queries the CIMA REST API for drug products by name. Lookup failures
//! never escape this module: the external contract is "zero results", with
//! the underlying cause recorded in the logs only.

use crate::cache::BoundedCache;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;

/// One candidate drug product returned by a registry search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "nregistro")]
    pub registration_id: String,
    #[serde(rename = "labtitular", default)]
    pub lab_holder: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "resultados", default)]
    results: Vec<ProductRecord>,
}

/// Internal failure classification. Only ever logged; callers see an empty
/// result set (LookupFailure is non-fatal by contract).
#[derive(Debug, Error)]
enum RegistryError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("registry returned HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed registry response: {0}")]
    Parse(#[from] serde_json::Error),
}

const SEARCH_TIMEOUT: Duration = Duration::from_secs(5);
const PAGE_SIZE: u32 = 50;
const CACHE_CAPACITY: usize = 64;

/// Client for the drug registry search endpoint.
pub struct RegistryClient {
    client: Client,
    base_url: String,
    cache: Mutex<BoundedCache<String, Vec<ProductRecord>>>,
}

impl RegistryClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(SEARCH_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cache: Mutex::new(BoundedCache::new(CACHE_CAPACITY)),
        }
    }

    /// Search products by name. Callers are expected to reject
    /// empty/whitespace input before invoking this.
    ///
    /// Any network, timeout, status, or parse failure degrades to an empty
    /// result set.
    pub async fn search(&self, name: &str) -> Vec<ProductRecord> {
        let key = name.trim().to_string();

        if let Some(hit) = self.cache.lock().expect("cache lock poisoned").get(&key) {
            tracing::debug!(query = %key, results = hit.len(), "Registry cache hit");
            return hit;
        }

        match self.fetch(&key).await {
            Ok(results) => {
                tracing::info!(query = %key, results = results.len(), "Registry search completed");
                self.cache
                    .lock()
                    .expect("cache lock poisoned")
                    .insert(key, results.clone());
                results
            }
            Err(e) => {
                // Timeout, refused connection, and malformed payload are
                // distinguished here for observability only; the caller sees
                // zero results either way.
                tracing::warn!(query = %key, error = %e, "Registry search failed, degrading to empty");
                Vec::new()
            }
        }
    }

    async fn fetch(&self, name: &str) -> Result<Vec<ProductRecord>, RegistryError> {
        let url = format!("{}/rest/medicamentos", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("nombre", name)])
            .query(&[("tamanioPagina", PAGE_SIZE)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::Status(status));
        }

        let body = response.text().await?;
        let parsed: SearchResponse = serde_json::from_str(&body)?;
        Ok(parsed.results)
    }
}
