//! Property-Based Tests for Cache Module
//!
//! Checks the LRU engine against a simple ordered model.

use proptest::prelude::*;
use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use crate::cache::{ByteView, LruCache, OnEvicted};

// == Strategies ==
/// Keys drawn from a small alphabet so updates and hits actually happen
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-h]{1,3}".prop_map(|s| s)
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9]{0,16}".prop_map(|s| s)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Add { key: String, value: String },
    Get { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), value_strategy()).prop_map(|(key, value)| CacheOp::Add { key, value }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
    ]
}

// == Reference Model ==
/// Front = most recently used, back = least recently used.
#[derive(Debug, Default)]
struct Model {
    order: VecDeque<(String, String)>,
    max_bytes: usize,
}

impl Model {
    fn bytes(&self) -> usize {
        self.order.iter().map(|(k, v)| k.len() + v.len()).sum()
    }

    fn touch(&mut self, key: &str) -> Option<String> {
        let pos = self.order.iter().position(|(k, _)| k == key)?;
        let entry = self.order.remove(pos)?;
        let value = entry.1.clone();
        self.order.push_front(entry);
        Some(value)
    }

    fn add(&mut self, key: &str, value: &str) -> Vec<(String, String)> {
        self.order.retain(|(k, _)| k != key);
        self.order.push_front((key.to_string(), value.to_string()));
        let mut evicted = Vec::new();
        while self.max_bytes != 0 && self.bytes() > self.max_bytes {
            if let Some(entry) = self.order.pop_back() {
                evicted.push(entry);
            }
        }
        evicted
    }
}

fn recording_cache(max_bytes: usize) -> (LruCache<ByteView>, Arc<Mutex<Vec<(String, String)>>>) {
    let evicted = Arc::new(Mutex::new(Vec::new()));
    let sink = evicted.clone();
    let on_evicted: OnEvicted<ByteView> = Box::new(move |key, value| {
        sink.lock().unwrap().push((key, value.to_string()));
    });
    (LruCache::new(max_bytes, Some(on_evicted)), evicted)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Any interleaving of adds and gets matches the model: same contents, same
    // recency order, same evictions in the same order, and the byte total
    // never exceeds the budget.
    #[test]
    fn prop_matches_reference_model(
        max_bytes in 1usize..48,
        ops in prop::collection::vec(cache_op_strategy(), 1..80)
    ) {
        let (mut lru, evicted) = recording_cache(max_bytes);
        let mut model = Model { max_bytes, ..Default::default() };
        let mut expected_evicted = Vec::new();

        for op in ops {
            match op {
                CacheOp::Add { key, value } => {
                    lru.add(&key, ByteView::from(value.as_str()));
                    expected_evicted.extend(model.add(&key, &value));
                }
                CacheOp::Get { key } => {
                    let got = lru.get(&key).map(|v| v.to_string());
                    prop_assert_eq!(got, model.touch(&key));
                }
            }

            prop_assert!(lru.bytes() <= max_bytes);
            prop_assert_eq!(lru.bytes(), model.bytes());
            prop_assert_eq!(lru.len(), model.order.len());
        }

        let keys: Vec<&str> = lru.keys().collect();
        let model_keys: Vec<&str> = model.order.iter().map(|(k, _)| k.as_str()).collect();
        prop_assert_eq!(keys, model_keys);
        prop_assert_eq!(&*evicted.lock().unwrap(), &expected_evicted);
    }

    // With no budget nothing is ever evicted and the entry count tracks the
    // number of distinct keys.
    #[test]
    fn prop_unbounded_never_evicts(
        entries in prop::collection::vec((key_strategy(), value_strategy()), 1..200)
    ) {
        let (mut lru, evicted) = recording_cache(0);
        let mut seen = HashSet::new();

        for (key, value) in entries {
            lru.add(&key, ByteView::from(value.as_str()));
            seen.insert(key);
            prop_assert_eq!(lru.len(), seen.len());
        }

        prop_assert!(evicted.lock().unwrap().is_empty());
    }

    // A get between two inserts saves the touched entry from the next
    // eviction.
    #[test]
    fn prop_get_protects_from_eviction(
        a in "a[a-z]{2}",
        b in "b[a-z]{2}",
        c in "c[a-z]{2}",
        value in "[0-9]{3}"
    ) {
        // Each entry is 6 bytes; the budget fits exactly two
        let (mut lru, evicted) = recording_cache(12);
        lru.add(&a, ByteView::from(value.as_str()));
        lru.add(&b, ByteView::from(value.as_str()));

        prop_assert!(lru.get(&a).is_some());
        lru.add(&c, ByteView::from(value.as_str()));

        prop_assert!(lru.contains(&a));
        prop_assert!(!lru.contains(&b));
        prop_assert!(lru.contains(&c));
        prop_assert_eq!(&*evicted.lock().unwrap(), &vec![(b.clone(), value.clone())]);
    }
}
