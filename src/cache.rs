//! Bounded in-memory cache for external lookups
//!
//! Registry and leaflet responses are reference data for the lifetime of a
//! session, so there is no expiry — only a capacity bound with oldest-first
//! eviction.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// Insert-order-evicting map with a fixed capacity.
pub struct BoundedCache<K, V> {
    entries: HashMap<K, V>,
    order: VecDeque<K>,
    capacity: usize,
}

impl<K: Eq + Hash + Clone, V: Clone> BoundedCache<K, V> {
    /// Create a cache holding at most `capacity` entries.
    ///
    /// A zero capacity is treated as one: a cache that can never hold
    /// anything would silently defeat the memoization contract.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.entries.get(key).cloned()
    }

    pub fn insert(&mut self, key: K, value: V) {
        if self.entries.insert(key.clone(), value).is_none() {
            self.order.push_back(key);
            if self.order.len() > self.capacity {
                if let Some(oldest) = self.order.pop_front() {
                    self.entries.remove(&oldest);
                }
            }
        }
    }

    #[allow(dead_code)] // API completeness
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)] // API completeness
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
