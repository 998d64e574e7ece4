//! API Routes
//!
//! Configures the Axum routers for the peer listener and the front-end API.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use super::handlers::{api_handler, health_handler, peer_handler, stats_handler, AppState};
use crate::group::Group;

/// Creates the router served on the peer listener.
///
/// # Endpoints
/// - `GET <base-path><group>/<key>` - Peer protocol, raw value bytes
/// - `GET /stats` - Group and cache statistics
/// - `GET /health` - Health check endpoint
pub fn create_router(state: AppState) -> Router {
    let base_path = state.pool.base_path().to_string();

    Router::new()
        // The bare base path is routed too so it is rejected as malformed
        .route(&base_path, get(peer_handler))
        .route(&format!("{}*path", base_path), get(peer_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Creates the front-end router reading through `group`.
///
/// # Endpoints
/// - `GET /api?key=<key>` - Value bytes, or the error text
pub fn create_api_router(group: Arc<Group>) -> Router {
    Router::new()
        .route("/api", get(api_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(group)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;
    use crate::group::{GetterFunc, Registry};
    use crate::peers::HttpPool;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    fn scores() -> Group {
        Group::new(
            "scores",
            2 << 10,
            GetterFunc(|key: &str| match key {
                "Tom" => Ok(b"630".to_vec()),
                _ => Err(CacheError::NotFound(format!("{} not exist", key))),
            }),
        )
    }

    fn create_test_app() -> Router {
        let registry = Registry::new();
        registry.register(scores());
        let pool = HttpPool::new("http://localhost:8001").unwrap();
        pool.set_peers(["http://localhost:8001"]);
        create_router(AppState::new(Arc::new(registry), Arc::new(pool)))
    }

    async fn status_of(app: Router, uri: &str) -> StatusCode {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        assert_eq!(status_of(create_test_app(), "/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        assert_eq!(status_of(create_test_app(), "/stats").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_peer_endpoint() {
        let app = create_test_app();

        assert_eq!(status_of(app.clone(), "/_geecache/scores/Tom").await, StatusCode::OK);
        assert_eq!(status_of(app.clone(), "/_geecache/").await, StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(app.clone(), "/_geecache/scores").await,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(app, "/_geecache/nope/Tom").await, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_api_endpoint() {
        let app = create_api_router(Arc::new(scores()));

        assert_eq!(status_of(app.clone(), "/api?key=Tom").await, StatusCode::OK);
        assert_eq!(
            status_of(app.clone(), "/api?key=kkk").await,
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(status_of(app, "/api").await, StatusCode::BAD_REQUEST);
    }
}
