//! Group Module
//!
//! A named cache namespace: local LRU store, collapsed loads, and routing of
//! misses to the owning peer or the source of truth.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, instrument, trace, warn, Instrument, Span};

use crate::cache::{ByteView, CacheStats, CacheStore};
use crate::error::{CacheError, Result};
use crate::flight::SingleFlight;
use crate::group::{Getter, GroupStats, GroupStatsSnapshot};
use crate::peers::{PeerGetter, PeerPicker};

// == Group ==
/// A read-through cache namespace.
///
/// `get` answers from the main cache when it can. A miss is collapsed per
/// key, then loaded from the peer that owns the key on the ring, or from the
/// group's [`Getter`] when this node owns it. Successful loads populate the
/// main cache; errors are returned as-is and never cached.
///
/// A load that has started runs to completion even if the caller that
/// started it goes away.
pub struct Group {
    source: Source,
    loader: SingleFlight<Result<ByteView>>,
}

/// Everything a load needs, cheap to clone into the task running it.
#[derive(Clone)]
struct Source {
    name: Arc<str>,
    getter: Arc<dyn Getter>,
    peers: Option<Arc<dyn PeerPicker>>,
    main_cache: Arc<CacheStore>,
    stats: Arc<GroupStats>,
}

impl Group {
    // == Constructor ==
    /// Creates a group with a main cache of `cache_bytes` (0 = unlimited)
    /// that loads misses from `getter`.
    pub fn new<G>(name: impl Into<String>, cache_bytes: usize, getter: G) -> Self
    where
        G: Getter + 'static,
    {
        let name: String = name.into();
        Self {
            source: Source {
                name: Arc::from(name),
                getter: Arc::new(getter),
                peers: None,
                main_cache: Arc::new(CacheStore::new(cache_bytes)),
                stats: Arc::new(GroupStats::default()),
            },
            loader: SingleFlight::new(),
        }
    }

    // == With Peers ==
    /// Routes misses for keys owned by other nodes through `peers`.
    pub fn with_peers(mut self, peers: Arc<dyn PeerPicker>) -> Self {
        self.source.peers = Some(peers);
        self
    }

    pub fn name(&self) -> &str {
        &self.source.name
    }

    // == Get ==
    /// Returns the value for `key`, loading and caching it on a miss.
    #[instrument(skip(self), fields(group = %self.source.name))]
    pub async fn get(&self, key: &str) -> Result<ByteView> {
        let stats = &self.source.stats;
        stats.record_get();
        if key.is_empty() {
            return Err(CacheError::InvalidArgument("key is required".to_string()));
        }

        if let Some(value) = self.source.main_cache.get(key) {
            stats.record_cache_hit();
            debug!("cache hit");
            return Ok(value);
        }

        self.load(key).await
    }

    async fn load(&self, key: &str) -> Result<ByteView> {
        self.source.stats.record_load();

        let source = self.source.clone();
        let owned = key.to_owned();
        let load = move || {
            async move { source.load_once(&owned).await }.instrument(Span::current())
        };

        match self.loader.run(key, load).await {
            Some((result, shared)) => {
                if shared {
                    trace!("shared an in-flight load");
                }
                result
            }
            None => Err(CacheError::Internal(format!("load of {} panicked", key))),
        }
    }

    // == Stats ==
    pub fn stats(&self) -> GroupStatsSnapshot {
        self.source.stats.snapshot()
    }

    /// Statistics of the main cache.
    pub fn cache_stats(&self) -> CacheStats {
        self.source.main_cache.stats()
    }
}

impl Source {
    /// Body of a collapsed load; runs at most once per key at a time.
    async fn load_once(&self, key: &str) -> Result<ByteView> {
        // A flight for this key may have populated the cache just before ours
        if let Some(value) = self.main_cache.peek(key) {
            self.stats.record_cache_hit();
            return Ok(value);
        }
        self.stats.record_load_deduped();

        let peer = self.peers.as_ref().and_then(|peers| peers.pick_peer(key));
        let value = match peer {
            Some(peer) => self.get_from_peer(peer.as_ref(), key).await?,
            None => self.get_locally(key).await?,
        };

        self.main_cache.add(key, value.clone());
        Ok(value)
    }

    async fn get_from_peer(&self, peer: &dyn PeerGetter, key: &str) -> Result<ByteView> {
        match peer.get(&self.name, key).await {
            Ok(bytes) => {
                self.stats.record_peer_load();
                debug!(bytes = bytes.len(), "loaded from peer");
                Ok(ByteView::copy_from_slice(&bytes))
            }
            Err(err) => {
                self.stats.record_peer_error();
                warn!(error = %err, "failed to get from peer");
                Err(err)
            }
        }
    }

    async fn get_locally(&self, key: &str) -> Result<ByteView> {
        match self.getter.get(key).await {
            Ok(bytes) => {
                self.stats.record_local_load();
                info!(bytes = bytes.len(), "loaded from source");
                Ok(ByteView::copy_from_slice(&bytes))
            }
            Err(err) => {
                self.stats.record_local_load_err();
                debug!(error = %err, "source load failed");
                Err(err)
            }
        }
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("name", &self.source.name)
            .field("main_cache", &self.source.main_cache)
            .field("has_peers", &self.source.peers.is_some())
            .finish()
    }
}
