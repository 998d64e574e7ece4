//! API Module
//!
//! HTTP handlers and routing for a cache node.
//!
//! # Endpoints
//! - `GET /_geecache/<group>/<key>` - Peer protocol
//! - `GET /stats` - Group and cache statistics
//! - `GET /health` - Health check endpoint
//! - `GET /api?key=<key>` - Front-end read (separate listener)

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::{create_api_router, create_router};
