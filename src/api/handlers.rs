//! API Handlers
//!
//! HTTP request handlers for the peer protocol, the admin endpoints and the
//! front-end read.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, Uri},
    response::{IntoResponse, Response},
    Json,
};
use tracing::debug;

use crate::cache::ByteView;
use crate::error::{CacheError, Result};
use crate::group::{Group, Registry};
use crate::models::{ApiQuery, GroupStatsResponse, HealthResponse, StatsResponse};
use crate::peers::HttpPool;

/// Application state shared across the peer and admin handlers.
#[derive(Clone)]
pub struct AppState {
    /// Groups this node can serve
    pub registry: Arc<Registry>,
    /// This node's view of the peer set
    pub pool: Arc<HttpPool>,
}

impl AppState {
    /// Creates a new AppState.
    pub fn new(registry: Arc<Registry>, pool: Arc<HttpPool>) -> Self {
        Self { registry, pool }
    }
}

/// Handler for GET <base-path><group>/<key>
///
/// Serves a value to a peer. Only the first segment after the base path
/// names the group; the rest of the path is the key verbatim.
pub async fn peer_handler(State(state): State<AppState>, uri: Uri) -> Result<Response> {
    let path = uri.path();
    debug!(path, "peer request");

    let rest = path
        .strip_prefix(state.pool.base_path())
        .ok_or_else(|| CacheError::BadRequest(format!("unexpected path: {}", path)))?;
    let (group_name, key) = rest
        .split_once('/')
        .ok_or_else(|| CacheError::BadRequest("expected <group>/<key>".to_string()))?;
    let group_name = decode(group_name)?;
    let key = decode(key)?;

    let group = state
        .registry
        .get(&group_name)
        .ok_or(CacheError::GroupNotFound(group_name))?;
    let view = group.get(&key).await?;

    Ok(octet_stream(view))
}

/// Handler for GET /stats
///
/// Returns load and cache statistics for every registered group.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let groups = state
        .registry
        .names()
        .iter()
        .filter_map(|name| state.registry.get(name))
        .map(|group| GroupStatsResponse::from_group(&group))
        .collect();

    Json(StatsResponse {
        self_url: state.pool.self_url().to_string(),
        peers: state.pool.peers(),
        groups,
    })
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Handler for GET /api?key=<key>
///
/// Front-end read through a single group.
pub async fn api_handler(
    State(group): State<Arc<Group>>,
    Query(query): Query<ApiQuery>,
) -> Result<Response> {
    let view = group.get(&query.key).await?;
    Ok(octet_stream(view))
}

fn octet_stream(view: ByteView) -> Response {
    (
        [(header::CONTENT_TYPE, "application/octet-stream")],
        view.byte_slice(),
    )
        .into_response()
}

fn decode(segment: &str) -> Result<String> {
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .map_err(|e| CacheError::BadRequest(format!("invalid path encoding: {}", e)))
}
