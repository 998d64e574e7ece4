//! GeeCache - A distributed read-through cache
//!
//! Byte-budgeted LRU eviction, consistent-hash key ownership, collapsed
//! concurrent loads, and peer fetches over HTTP.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod flight;
pub mod group;
pub mod models;
pub mod peers;
pub mod ring;

pub use api::AppState;
pub use cache::ByteView;
pub use config::Config;
pub use error::{CacheError, Result};
pub use group::{Getter, GetterFunc, Group, Registry};
pub use peers::HttpPool;
