//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache reads, peer fetches and the peer protocol.
///
/// Payloads are plain strings so a single load result can be cloned and
/// handed to every caller that was collapsed onto it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Empty or malformed key passed to a read
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The source of truth has no data for the key
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Fetching the key from the owning peer failed
    #[error("Peer error: {0}")]
    PeerError(String),

    /// Malformed peer-protocol path
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Peer-protocol request names an unregistered group
    #[error("No such group: {0}")]
    GroupNotFound(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CacheError {
    // == Status Code ==
    /// HTTP status used when this error answers a peer-protocol request.
    pub fn status_code(&self) -> StatusCode {
        match self {
            CacheError::BadRequest(_) | CacheError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            CacheError::GroupNotFound(_) => StatusCode::NOT_FOUND,
            CacheError::NotFound(_) | CacheError::PeerError(_) | CacheError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        // Peers read the body as raw error text
        (self.status_code(), self.to_string()).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
