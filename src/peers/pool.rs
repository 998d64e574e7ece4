//! HTTP Pool Module
//!
//! Tracks the peer set on a consistent-hash ring and hands out clients for
//! the peer owning a key.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use reqwest::Client;
use tracing::{debug, info};

use crate::error::{CacheError, Result};
use crate::peers::{HttpGetter, PeerGetter, PeerPicker, DEFAULT_BASE_PATH};
use crate::ring::{HashRing, DEFAULT_REPLICAS};

/// Ring and per-peer clients, swapped together on membership changes.
#[derive(Debug)]
struct Membership {
    ring: HashRing,
    getters: HashMap<String, Arc<HttpGetter>>,
}

// == HTTP Pool ==
/// [`PeerPicker`] over a set of HTTP peers identified by base URL, e.g.
/// `http://10.0.0.2:8001`.
///
/// This node's own URL should be part of the peer set; keys it owns on the
/// ring are picked as local.
#[derive(Debug)]
pub struct HttpPool {
    self_url: String,
    base_path: String,
    client: Client,
    membership: RwLock<Membership>,
}

impl HttpPool {
    // == Constructor ==
    /// Creates a pool with no peers serving under [`DEFAULT_BASE_PATH`].
    pub fn new(self_url: impl Into<String>) -> Result<Self> {
        Self::with_base_path(self_url, DEFAULT_BASE_PATH)
    }

    /// Creates a pool serving under `base_path`, normalised to start and end
    /// with `/`.
    ///
    /// Peer URLs, `self_url` included, are compared without trailing `/`.
    pub fn with_base_path(self_url: impl Into<String>, base_path: &str) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| CacheError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            self_url: normalize_peer(&self_url.into()),
            base_path: normalize_base_path(base_path),
            client,
            membership: RwLock::new(Membership {
                ring: HashRing::new(DEFAULT_REPLICAS, None),
                getters: HashMap::new(),
            }),
        })
    }

    pub fn self_url(&self) -> &str {
        &self.self_url
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    // == Set Peers ==
    /// Replaces the peer set.
    pub fn set_peers<I, S>(&self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ring = HashRing::new(DEFAULT_REPLICAS, None);
        let mut getters = HashMap::new();
        for peer in peers {
            let peer = normalize_peer(peer.as_ref());
            ring.add([&peer]);
            let getter = Arc::new(self.getter_for(&peer));
            getters.insert(peer, getter);
        }

        info!(peers = getters.len(), "peer set replaced");
        *self.membership.write() = Membership { ring, getters };
    }

    // == Add Peers ==
    /// Adds peers to the ring. Only keys in the arcs they take over move.
    pub fn add_peers<I, S>(&self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut membership = self.membership.write();
        for peer in peers {
            let peer = normalize_peer(peer.as_ref());
            if membership.getters.contains_key(&peer) {
                continue;
            }
            membership.ring.add([&peer]);
            info!(peer = %peer, "peer added");
            let getter = Arc::new(self.getter_for(&peer));
            membership.getters.insert(peer, getter);
        }
    }

    // == Remove Peer ==
    pub fn remove_peer(&self, peer: &str) {
        let peer = normalize_peer(peer);
        let mut membership = self.membership.write();
        if membership.getters.remove(&peer).is_some() {
            membership.ring.remove(&peer);
            info!(peer = %peer, "peer removed");
        }
    }

    /// Current peer URLs, sorted.
    pub fn peers(&self) -> Vec<String> {
        let mut peers: Vec<String> = self.membership.read().getters.keys().cloned().collect();
        peers.sort();
        peers
    }

    fn getter_for(&self, peer: &str) -> HttpGetter {
        HttpGetter::new(format!("{}{}", peer, self.base_path), self.client.clone())
    }
}

impl PeerPicker for HttpPool {
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>> {
        let membership = self.membership.read();
        let peer = membership.ring.get(key)?;
        if peer == self.self_url {
            return None;
        }
        debug!(peer, key, "picked peer");
        membership
            .getters
            .get(peer)
            .map(|getter| getter.clone() as Arc<dyn PeerGetter>)
    }
}

/// Canonical form of a peer base URL: trimmed, without trailing `/`.
pub(crate) fn normalize_peer(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn normalize_base_path(base_path: &str) -> String {
    let trimmed = base_path.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", trimmed)
    }
}
