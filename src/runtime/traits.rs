//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the executor with mock implementations.

use crate::leaflet::{LeafletClient, LeafletText};
use crate::registry::{ProductRecord, RegistryClient};
use async_trait::async_trait;
use std::sync::Arc;

/// Product lookup against the drug registry
#[async_trait]
pub trait ProductSearch: Send + Sync {
    /// Search products by name. Lookup failures degrade to an empty set.
    async fn search(&self, name: &str) -> Vec<ProductRecord>;
}

/// Source of official leaflet text
#[async_trait]
pub trait LeafletSource: Send + Sync {
    /// Fetch the leaflet for a registration id; `None` when unavailable.
    async fn fetch(&self, registration_id: &str) -> Option<LeafletText>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: ProductSearch + ?Sized> ProductSearch for Arc<T> {
    async fn search(&self, name: &str) -> Vec<ProductRecord> {
        (**self).search(name).await
    }
}

#[async_trait]
impl<T: LeafletSource + ?Sized> LeafletSource for Arc<T> {
    async fn fetch(&self, registration_id: &str) -> Option<LeafletText> {
        (**self).fetch(registration_id).await
    }
}

// ============================================================================
// Production Adapters
// ============================================================================

#[async_trait]
impl ProductSearch for RegistryClient {
    async fn search(&self, name: &str) -> Vec<ProductRecord> {
        RegistryClient::search(self, name).await
    }
}

#[async_trait]
impl LeafletSource for LeafletClient {
    async fn fetch(&self, registration_id: &str) -> Option<LeafletText> {
        LeafletClient::fetch(self, registration_id).await
    }
}
