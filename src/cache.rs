//! In-memory time-to-live cache
//!
//! Entries are never mutated; a `set` replaces the entry under its key.
//! Expired entries are evicted lazily, on the read that finds them stale.

use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

/// A cached value and the moment it was stored
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

/// Keyed store whose values stay fresh for a fixed TTL
pub struct TtlCache<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    /// Creates an empty cache
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Returns the value for `key` if it was stored no more than `ttl` ago
    ///
    /// A stale entry is removed and reported as absent.
    pub async fn get(&self, key: &str) -> Option<V> {
        {
            let entries = self.entries.read().await;
            let entry = entries.get(key)?;
            if entry.stored_at.elapsed() <= self.ttl {
                return Some(entry.value.clone());
            }
        }

        let mut entries = self.entries.write().await;
        // Another writer may have refreshed the key between the two locks
        if let Some(entry) = entries.get(key) {
            if entry.stored_at.elapsed() <= self.ttl {
                return Some(entry.value.clone());
            }
            entries.remove(key);
            tracing::debug!(key, "Evicted expired cache entry");
        }
        None
    }

    /// Stores `value` under `key`, replacing any previous entry
    pub async fn set(&self, key: &str, value: V) {
        let entry = CacheEntry {
            value,
            stored_at: Instant::now(),
        };
        self.entries.write().await.insert(key.to_string(), entry);
    }

    /// Removes every entry
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Number of stored entries, expired ones included until they are read
    pub async fn size(&self) -> usize {
        self.entries.read().await.len()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
