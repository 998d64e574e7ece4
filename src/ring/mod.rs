//! Ring Module
//!
//! Deterministic key-to-node assignment via consistent hashing.

mod hash_ring;

pub use hash_ring::{HashFn, HashRing};

// == Public Constants ==
/// Virtual nodes placed on the ring for every real node
pub const DEFAULT_REPLICAS: usize = 50;
