//! 分类缓存模块：按规范化查询缓存分类结果，避免重复的分类 API 调用。
//!
//! # Classification Cache Module
//!
//! Remembers whether a normalized query was judged in-domain, so repeated queries skip
//! the classification call.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`ClassificationCache`] | Thread-safe bounded cache with hit/miss statistics |
//! | [`CacheConfig`] | Capacity and eviction policy |
//! | [`ClassificationStore`] | Trait for the unsynchronized bounded store |
//! | [`FlushStore`] | Clears everything when full (default) |
//! | [`LruStore`] | Evicts the least recently used entry |
//! | [`QueryKey`] | Trimmed, lower-cased query text |
//!
//! ## Example
//!
//! ```rust
//! use tripmate::cache::{CacheConfig, ClassificationCache, EvictionPolicy, QueryKey};
//!
//! let cache = ClassificationCache::new(
//!     CacheConfig::new().with_capacity(1000).with_eviction(EvictionPolicy::Flush),
//! );
//! cache.put(QueryKey::normalize("Is Kyoto nice in April?"), true);
//! assert_eq!(cache.get(&QueryKey::normalize("  is kyoto nice in april?")), Some(true));
//! ```
//!
//! Entries have no expiry. A classification for a literal query string is assumed
//! stable for the life of the process; nothing is persisted.

mod backend;
mod key;
mod manager;

pub use backend::{ClassificationStore, EvictionPolicy, FlushStore, LruStore};
pub use key::QueryKey;
pub use manager::{CacheConfig, CacheStats, ClassificationCache, MAX_CACHE_SIZE};
