//! Response DTOs for the admin endpoints
//!
//! Defines the JSON bodies returned by `/health` and `/stats`.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::group::{Group, GroupStatsSnapshot};

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// This node's base URL
    pub self_url: String,
    /// Peer set currently on the ring
    pub peers: Vec<String>,
    /// Per-group statistics, ordered by group name
    pub groups: Vec<GroupStatsResponse>,
}

/// Statistics of a single group
#[derive(Debug, Clone, Serialize)]
pub struct GroupStatsResponse {
    pub name: String,
    /// Load-path counters
    pub group: GroupStatsSnapshot,
    /// Main cache counters and usage
    pub cache: CacheStats,
    /// Main cache hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl GroupStatsResponse {
    /// Captures the current statistics of `group`
    pub fn from_group(group: &Group) -> Self {
        let cache = group.cache_stats();
        Self {
            name: group.name().to_string(),
            group: group.stats(),
            hit_rate: cache.hit_rate(),
            cache,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
