//! Cache Store Module
//!
//! Thread-safe main cache of a group: an [`LruCache`] of [`ByteView`]s behind
//! a single mutex, plus hit/miss/eviction counters.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::cache::{ByteView, CacheStats, LruCache, OnEvicted};

// == Cache Store ==
/// Mutex-guarded LRU store shared by every caller of a group.
#[derive(Debug)]
pub struct CacheStore {
    lru: Mutex<LruCache<ByteView>>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: Arc<AtomicU64>,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a store with the given byte budget (0 = unlimited).
    pub fn new(max_bytes: usize) -> Self {
        let evictions = Arc::new(AtomicU64::new(0));
        let counter = evictions.clone();
        let on_evicted: OnEvicted<ByteView> = Box::new(move |key, value| {
            counter.fetch_add(1, Ordering::Relaxed);
            debug!(key = %key, bytes = value.len(), "evicted cache entry");
        });

        Self {
            lru: Mutex::new(LruCache::new(max_bytes, Some(on_evicted))),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions,
        }
    }

    // == Add ==
    /// Inserts or replaces a value, evicting older entries as needed.
    pub fn add(&self, key: &str, value: ByteView) {
        self.lru.lock().add(key, value);
    }

    // == Get ==
    /// Returns the cached value and refreshes its recency.
    pub fn get(&self, key: &str) -> Option<ByteView> {
        let value = self.lru.lock().get(key).cloned();
        let counter = if value.is_some() {
            &self.hits
        } else {
            &self.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        value
    }

    // == Peek ==
    /// Returns the cached value without counting a hit or miss and without
    /// refreshing its recency.
    pub fn peek(&self, key: &str) -> Option<ByteView> {
        self.lru.lock().peek(key).cloned()
    }

    // == Length ==
    /// Returns the current number of entries in the store.
    pub fn len(&self) -> usize {
        self.lru.lock().len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.lru.lock().is_empty()
    }

    // == Stats ==
    /// Returns current store statistics.
    pub fn stats(&self) -> CacheStats {
        let lru = self.lru.lock();
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            total_entries: lru.len(),
            total_bytes: lru.bytes(),
            max_bytes: lru.max_bytes(),
        }
    }
}
