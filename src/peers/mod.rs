//! Peers Module
//!
//! Locating the node that owns a key and fetching values from it.

mod client;
mod picker;
mod pool;

pub use client::HttpGetter;
pub use picker::{PeerGetter, PeerPicker};
pub use pool::HttpPool;
pub(crate) use pool::normalize_peer;

// == Public Constants ==
/// Path prefix of the peer protocol
pub const DEFAULT_BASE_PATH: &str = "/_geecache/";
