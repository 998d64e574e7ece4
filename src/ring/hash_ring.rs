//! Hash Ring Module
//!
//! Consistent hashing with virtual nodes.

use std::collections::HashMap;
use std::fmt;

/// Maps bytes to a position on the ring.
pub type HashFn = fn(&[u8]) -> u32;

// == Hash Ring ==
/// Consistent-hash ring mapping keys to node identifiers.
///
/// Every real node is placed on the ring `replicas` times, at
/// `hash("{i}{node}")` for `i` in `0..replicas`. A key belongs to the first
/// virtual node clockwise from `hash(key)`, wrapping to the start of the
/// ring past the largest position.
#[derive(Clone)]
pub struct HashRing {
    hash: HashFn,
    replicas: usize,
    /// Sorted virtual-node positions
    keys: Vec<u32>,
    /// Virtual-node position -> real nodes placed there, latest last
    nodes: HashMap<u32, Vec<String>>,
}

impl HashRing {
    // == Constructor ==
    /// Creates an empty ring. `None` selects CRC-32 (IEEE).
    pub fn new(replicas: usize, hash: Option<HashFn>) -> Self {
        Self {
            hash: hash.unwrap_or(crc32fast::hash),
            replicas,
            keys: Vec::new(),
            nodes: HashMap::new(),
        }
    }

    // == Add ==
    /// Places each node on the ring.
    ///
    /// A virtual position already taken by another node is owned by the
    /// node added last, and handed back when that node is removed.
    pub fn add<I, S>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for node in nodes {
            let node = node.as_ref();
            for i in 0..self.replicas {
                let hash = self.virtual_hash(i, node);
                let owners = self.nodes.entry(hash).or_default();
                if owners.is_empty() {
                    self.keys.push(hash);
                }
                owners.push(node.to_string());
            }
        }
        self.keys.sort_unstable();
    }

    // == Remove ==
    /// Takes a node's virtual positions off the ring.
    pub fn remove(&mut self, node: &str) {
        for i in 0..self.replicas {
            let hash = self.virtual_hash(i, node);
            let Some(owners) = self.nodes.get_mut(&hash) else {
                continue;
            };
            if let Some(pos) = owners.iter().rposition(|owner| owner == node) {
                owners.remove(pos);
            }
            if owners.is_empty() {
                self.nodes.remove(&hash);
                if let Ok(pos) = self.keys.binary_search(&hash) {
                    self.keys.remove(pos);
                }
            }
        }
    }

    // == Get ==
    /// Returns the node owning `key`, or `None` on an empty ring.
    pub fn get(&self, key: &str) -> Option<&str> {
        if self.keys.is_empty() {
            return None;
        }

        let hash = (self.hash)(key.as_bytes());
        let idx = self.keys.partition_point(|&k| k < hash);
        let position = self.keys[idx % self.keys.len()];
        self.nodes
            .get(&position)
            .and_then(|owners| owners.last())
            .map(String::as_str)
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of virtual nodes on the ring.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn replicas(&self) -> usize {
        self.replicas
    }

    fn virtual_hash(&self, replica: usize, node: &str) -> u32 {
        (self.hash)(format!("{}{}", replica, node).as_bytes())
    }
}

impl fmt::Debug for HashRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashRing")
            .field("replicas", &self.replicas)
            .field("virtual_nodes", &self.keys.len())
            .finish()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    /// Treats the key as a decimal number.
    fn identity_hash(data: &[u8]) -> u32 {
        std::str::from_utf8(data)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0)
    }

    fn assert_owners(ring: &HashRing, cases: &[(&str, &str)]) {
        for (key, owner) in cases {
            assert_eq!(ring.get(key), Some(*owner), "asking for {}", key);
        }
    }

    #[test]
    fn test_hashing() {
        let mut ring = HashRing::new(3, Some(identity_hash));

        // Virtual nodes: 2, 4, 6, 12, 14, 16, 22, 24, 26
        ring.add(["6", "4", "2"]);
        assert_eq!(ring.len(), 9);

        let mut cases = vec![("2", "2"), ("11", "2"), ("23", "4"), ("27", "2"), ("3", "4")];
        assert_owners(&ring, &cases);

        // Adds 8, 18, 28
        ring.add(["8"]);

        // 27 now maps to 8
        cases[3] = ("27", "8");
        assert_owners(&ring, &cases);
    }

    #[test]
    fn test_keys_stay_sorted() {
        let mut ring = HashRing::new(3, Some(identity_hash));
        ring.add(["6", "4", "2"]);
        ring.add(["8"]);

        assert!(ring.keys.windows(2).all(|w| w[0] < w[1]));
        assert!(ring.keys.iter().all(|k| ring.nodes.contains_key(k)));
    }

    #[test]
    fn test_empty_ring() {
        let ring = HashRing::new(3, None);
        assert!(ring.is_empty());
        assert_eq!(ring.get("anything"), None);
    }

    #[test]
    fn test_remove_node() {
        let mut ring = HashRing::new(3, Some(identity_hash));
        ring.add(["6", "4", "2", "8"]);

        ring.remove("8");

        assert_eq!(ring.len(), 9);
        assert_owners(&ring, &[("27", "2"), ("7", "2"), ("18", "2")]);
        assert!(ring.keys.iter().all(|k| ring.nodes.contains_key(k)));
    }

    #[test]
    fn test_colliding_position_returns_to_earlier_owner() {
        // "2" and "02" both land on 2 ("02" and "002")
        let mut ring = HashRing::new(1, Some(identity_hash));
        ring.add(["2", "02"]);
        assert_eq!(ring.len(), 1);
        assert_eq!(ring.get("1"), Some("02"));

        ring.remove("02");
        assert_eq!(ring.len(), 1);
        assert_eq!(ring.get("1"), Some("2"));

        ring.remove("2");
        assert!(ring.is_empty());
    }

    #[test]
    fn test_add_only_remaps_affected_arc() {
        let mut ring = HashRing::new(50, None);
        ring.add(["http://a:8001", "http://b:8002", "http://c:8003"]);

        let keys: Vec<String> = (0..1000).map(|i| format!("key-{}", i)).collect();
        let before: Vec<String> = keys
            .iter()
            .map(|k| ring.get(k).unwrap_or_default().to_string())
            .collect();

        ring.add(["http://d:8004"]);

        for (key, old) in keys.iter().zip(&before) {
            let new = ring.get(key).unwrap_or_default();
            // A key either stays put or moves to the new node
            assert!(
                new == old.as_str() || new == "http://d:8004",
                "{} moved {} -> {}",
                key,
                old,
                new
            );
        }
    }

    #[test]
    fn test_default_hash_spreads_keys() {
        let mut ring = HashRing::new(50, None);
        let nodes = ["http://a:8001", "http://b:8002", "http://c:8003"];
        ring.add(nodes);

        let mut counts = HashMap::new();
        for i in 0..3000 {
            let owner = ring.get(&format!("key-{}", i)).unwrap_or_default();
            *counts.entry(owner.to_string()).or_insert(0usize) += 1;
        }

        for node in nodes {
            assert!(counts.get(node).copied().unwrap_or(0) > 300, "{:?}", counts);
        }
    }
}
