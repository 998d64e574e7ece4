//! Peer Traits
//!
//! Seams between a group and the nodes that may own its keys.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

// == Peer Picker ==
/// Locates the peer that owns a key.
pub trait PeerPicker: Send + Sync {
    /// Returns the owning peer, or `None` when this node owns the key.
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>>;
}

// == Peer Getter ==
/// Client for fetching a value from one peer.
#[async_trait]
pub trait PeerGetter: Send + Sync {
    /// Fetches `key` from the peer's copy of `group`.
    async fn get(&self, group: &str, key: &str) -> Result<Vec<u8>>;
}
