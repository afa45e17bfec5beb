//! Bounded store implementations.

use super::key::QueryKey;
use lru::LruCache;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::str::FromStr;

/// How a full store makes room for a new key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvictionPolicy {
    /// Drop every entry, then insert.
    #[default]
    Flush,
    /// Drop the least recently used entry.
    Lru,
}

impl EvictionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvictionPolicy::Flush => "flush",
            EvictionPolicy::Lru => "lru",
        }
    }
}

impl FromStr for EvictionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flush" => Ok(EvictionPolicy::Flush),
            "lru" => Ok(EvictionPolicy::Lru),
            other => Err(format!("unknown eviction policy '{}' (expected flush or lru)", other)),
        }
    }
}

/// Capacity-bounded map from normalized query to classification.
///
/// Implementations are not synchronized; the cache wraps them in a lock.
pub trait ClassificationStore: Send {
    fn get(&mut self, key: &QueryKey) -> Option<bool>;
    /// Insert or update. Returns how many entries were evicted to make room.
    fn insert(&mut self, key: QueryKey, value: bool) -> usize;
    fn len(&self) -> usize;
    fn clear(&mut self);
    fn capacity(&self) -> usize;
    fn name(&self) -> &'static str;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn store_for(policy: EvictionPolicy, capacity: usize) -> Box<dyn ClassificationStore> {
    match policy {
        EvictionPolicy::Flush => Box::new(FlushStore::new(capacity)),
        EvictionPolicy::Lru => Box::new(LruStore::new(capacity)),
    }
}

pub struct FlushStore {
    entries: HashMap<QueryKey, bool>,
    capacity: usize,
}

impl FlushStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity: capacity.max(1),
        }
    }
}

impl ClassificationStore for FlushStore {
    fn get(&mut self, key: &QueryKey) -> Option<bool> {
        self.entries.get(key).copied()
    }

    fn insert(&mut self, key: QueryKey, value: bool) -> usize {
        let mut evicted = 0;
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            evicted = self.entries.len();
            self.entries.clear();
        }
        self.entries.insert(key, value);
        evicted
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn name(&self) -> &'static str {
        "flush"
    }
}

pub struct LruStore {
    entries: LruCache<QueryKey, bool>,
}

impl LruStore {
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(cap),
        }
    }
}

impl ClassificationStore for LruStore {
    fn get(&mut self, key: &QueryKey) -> Option<bool> {
        self.entries.get(key).copied()
    }

    fn insert(&mut self, key: QueryKey, value: bool) -> usize {
        match self.entries.push(key, value) {
            // `push` hands back the old pair on update and the evicted pair on overflow.
            Some((old_key, _)) if !self.entries.contains(&old_key) => 1,
            _ => 0,
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    fn name(&self) -> &'static str {
        "lru"
    }
}
