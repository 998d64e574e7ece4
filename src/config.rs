//! Configuration Module
//!
//! Handles loading and managing node configuration from environment variables.

use std::env;

use crate::peers::{normalize_peer, DEFAULT_BASE_PATH};

/// Node configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Peer-protocol listener port
    pub server_port: u16,
    /// This node's base URL on the ring
    pub self_url: String,
    /// Base URLs of every node in the cluster, this one included
    pub peers: Vec<String>,
    /// Main cache budget in bytes per group (0 = unlimited)
    pub cache_bytes: usize,
    /// Front-end API port, if the API server should run
    pub api_port: Option<u16>,
    /// Path prefix of the peer protocol
    pub base_path: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - Peer listener port (default: 8001)
    /// - `SELF_URL` - This node's base URL (default: `http://localhost:<SERVER_PORT>`)
    /// - `PEERS` - Comma-separated peer base URLs (default: `SELF_URL` only)
    /// - `CACHE_BYTES` - Cache budget per group in bytes (default: 2048)
    /// - `API_PORT` - Front-end API port (default: unset, API disabled)
    /// - `BASE_PATH` - Peer protocol path prefix (default: `/_geecache/`)
    pub fn from_env() -> Self {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Builds a Config from `var`, which maps a variable name to its value.
    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let server_port = parse(var("SERVER_PORT")).unwrap_or(defaults.server_port);
        let self_url = var("SELF_URL")
            .map(|v| normalize_peer(&v))
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| format!("http://localhost:{}", server_port));
        let peers = var("PEERS")
            .map(|v| parse_peers(&v))
            .filter(|peers| !peers.is_empty())
            .unwrap_or_else(|| vec![self_url.clone()]);

        Self {
            server_port,
            self_url,
            peers,
            cache_bytes: parse(var("CACHE_BYTES")).unwrap_or(defaults.cache_bytes),
            api_port: parse(var("API_PORT")),
            base_path: var("BASE_PATH").unwrap_or(defaults.base_path),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 8001,
            self_url: "http://localhost:8001".to_string(),
            peers: vec!["http://localhost:8001".to_string()],
            cache_bytes: 2 << 10,
            api_port: None,
            base_path: DEFAULT_BASE_PATH.to_string(),
        }
    }
}

fn parse<T: std::str::FromStr>(value: Option<String>) -> Option<T> {
    value.and_then(|v| v.trim().parse().ok())
}

fn parse_peers(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(normalize_peer)
        .filter(|peer| !peer.is_empty())
        .collect()
}
