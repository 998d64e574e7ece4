//! Cache Module
//!
//! Provides the byte-budgeted LRU engine and the immutable values it stores.

mod byteview;
mod lru;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use byteview::ByteView;
pub use lru::{LruCache, OnEvicted, Value};
pub use stats::CacheStats;
pub use store::CacheStore;
