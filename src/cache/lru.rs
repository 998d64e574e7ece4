//! LRU Cache Module
//!
//! Byte-budgeted least-recently-used cache. Not safe for concurrent access;
//! see [`CacheStore`](crate::cache::CacheStore) for the locked wrapper.

use std::collections::HashMap;
use std::fmt;

// == Value Trait ==
/// A value that knows how many bytes it occupies.
pub trait Value {
    /// Size in bytes counted against the cache budget.
    fn size(&self) -> usize;
}

/// Callback invoked with each entry dropped by [`LruCache::remove_oldest`].
pub type OnEvicted<V> = Box<dyn FnMut(String, V) + Send>;

// == Node ==
/// Arena slot. `prev` points towards the front (most recent), `next` towards
/// the back (least recent).
#[derive(Debug)]
struct Node<V> {
    key: String,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

// == LRU Cache ==
/// Fixed-memory LRU cache with byte-size accounting.
///
/// Entries live in a dense arena addressed by index and are threaded into a
/// recency list through `prev`/`next` indices:
/// - `head` = most recently used
/// - `tail` = least recently used
///
/// The size of an entry is `key.len() + value.size()`. A `max_bytes` of 0
/// disables eviction entirely.
pub struct LruCache<V> {
    /// Budget in bytes, 0 = unlimited
    max_bytes: usize,
    /// Sum of all entry sizes
    n_bytes: usize,
    nodes: Vec<Node<V>>,
    index: HashMap<String, usize>,
    head: Option<usize>,
    tail: Option<usize>,
    on_evicted: Option<OnEvicted<V>>,
}

impl<V: Value> LruCache<V> {
    // == Constructor ==
    /// Creates an empty cache with the given byte budget and optional
    /// eviction callback.
    pub fn new(max_bytes: usize, on_evicted: Option<OnEvicted<V>>) -> Self {
        Self {
            max_bytes,
            n_bytes: 0,
            nodes: Vec::new(),
            index: HashMap::new(),
            head: None,
            tail: None,
            on_evicted,
        }
    }

    // == Add ==
    /// Inserts or replaces a value and marks it most recently used, then
    /// evicts from the back until the budget holds again.
    pub fn add(&mut self, key: &str, value: V) {
        if let Some(&idx) = self.index.get(key) {
            self.move_to_front(idx);
            let node = &mut self.nodes[idx];
            self.n_bytes = self.n_bytes - node.value.size() + value.size();
            node.value = value;
        } else {
            let idx = self.nodes.len();
            self.n_bytes += key.len() + value.size();
            self.nodes.push(Node {
                key: key.to_owned(),
                value,
                prev: None,
                next: None,
            });
            self.index.insert(key.to_owned(), idx);
            self.push_front(idx);
        }

        while self.max_bytes != 0 && self.n_bytes > self.max_bytes {
            self.remove_oldest();
        }
    }

    // == Get ==
    /// Looks up a key and marks it most recently used on a hit.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let idx = *self.index.get(key)?;
        self.move_to_front(idx);
        Some(&self.nodes[idx].value)
    }

    // == Remove Oldest ==
    /// Evicts the least recently used entry. No-op on an empty cache.
    pub fn remove_oldest(&mut self) {
        let Some(idx) = self.tail else {
            return;
        };
        let node = self.detach(idx);
        self.n_bytes -= node.key.len() + node.value.size();
        if let Some(on_evicted) = self.on_evicted.as_mut() {
            on_evicted(node.key, node.value);
        }
    }

    // == Peek ==
    /// Looks up a key without touching its recency.
    pub fn peek(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&idx| &self.nodes[idx].value)
    }

    // == Contains ==
    /// Checks for a key without touching its recency.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    // == Keys ==
    /// Iterates keys from most to least recently used.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        std::iter::successors(self.head, move |&idx| self.nodes[idx].next)
            .map(move |idx| self.nodes[idx].key.as_str())
    }

    // == Length ==
    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Bytes currently held.
    pub fn bytes(&self) -> usize {
        self.n_bytes
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    // == List Plumbing ==

    fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return;
        }
        self.unlink(idx);
        self.push_front(idx);
    }

    fn push_front(&mut self, idx: usize) {
        self.nodes[idx].prev = None;
        self.nodes[idx].next = self.head;
        match self.head {
            Some(head) => self.nodes[head].prev = Some(idx),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);
        match prev {
            Some(prev) => self.nodes[prev].next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.nodes[next].prev = prev,
            None => self.tail = prev,
        }
        self.nodes[idx].prev = None;
        self.nodes[idx].next = None;
    }

    /// Unlinks a node and takes it out of the arena. The last slot is moved
    /// into the hole, so its neighbours and index entry are repointed.
    fn detach(&mut self, idx: usize) -> Node<V> {
        self.unlink(idx);
        self.index.remove(&self.nodes[idx].key);

        let last = self.nodes.len() - 1;
        if idx != last {
            let (prev, next) = (self.nodes[last].prev, self.nodes[last].next);
            match prev {
                Some(prev) => self.nodes[prev].next = Some(idx),
                None => self.head = Some(idx),
            }
            match next {
                Some(next) => self.nodes[next].prev = Some(idx),
                None => self.tail = Some(idx),
            }
            if let Some(slot) = self.index.get_mut(&self.nodes[last].key) {
                *slot = idx;
            }
        }

        self.nodes.swap_remove(idx)
    }
}

impl<V> fmt::Debug for LruCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("max_bytes", &self.max_bytes)
            .field("n_bytes", &self.n_bytes)
            .field("len", &self.nodes.len())
            .field("on_evicted", &self.on_evicted.is_some())
            .finish()
    }
}
