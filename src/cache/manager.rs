//! Classification cache.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

use super::backend::{store_for, ClassificationStore, EvictionPolicy};
use super::key::QueryKey;

/// Default upper bound on cached classifications.
pub const MAX_CACHE_SIZE: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    pub capacity: usize,
    pub eviction: EvictionPolicy,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: MAX_CACHE_SIZE,
            eviction: EvictionPolicy::Flush,
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
    pub fn with_eviction(mut self, eviction: EvictionPolicy) -> Self {
        self.eviction = eviction;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub size: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    /// Entries dropped to stay within capacity.
    pub evictions: u64,
}

impl CacheStats {
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

struct AtomicStats {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl AtomicStats {
    fn new() -> Self {
        Self {
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }
}

/// Bounded, thread-safe map from normalized query to a prior classification.
///
/// The size check and the insert run under one lock, so the capacity bound holds
/// under any interleaving of callers. Entries never expire on their own.
pub struct ClassificationCache {
    store: Mutex<Box<dyn ClassificationStore>>,
    policy: EvictionPolicy,
    stats: AtomicStats,
}

impl ClassificationCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            store: Mutex::new(store_for(config.eviction, config.capacity)),
            policy: config.eviction,
            stats: AtomicStats::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(CacheConfig::new().with_capacity(capacity))
    }

    // The store only holds booleans; a panic mid-operation cannot leave it torn.
    fn lock(&self) -> MutexGuard<'_, Box<dyn ClassificationStore>> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, key: &QueryKey) -> Option<bool> {
        let found = self.lock().get(key);
        match found {
            Some(_) => self.stats.hits.fetch_add(1, Ordering::Relaxed),
            None => self.stats.misses.fetch_add(1, Ordering::Relaxed),
        };
        found
    }

    pub fn put(&self, key: QueryKey, value: bool) {
        let evicted = self.lock().insert(key, value);
        if evicted > 0 {
            self.stats
                .evictions
                .fetch_add(evicted as u64, Ordering::Relaxed);
            debug!(
                evicted,
                policy = self.policy.as_str(),
                "classification cache made room"
            );
        }
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    pub fn stats(&self) -> CacheStats {
        let (size, capacity) = {
            let store = self.lock();
            (store.len(), store.capacity())
        };
        CacheStats {
            size,
            capacity,
            hits: self.stats.hits.load(Ordering::Relaxed),
            misses: self.stats.misses.load(Ordering::Relaxed),
            evictions: self.stats.evictions.load(Ordering::Relaxed),
        }
    }
}

impl Default for ClassificationCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}
