//! Request DTOs for the front-end API
//!
//! Defines the query string accepted by `GET /api`.

use serde::Deserialize;

/// Query for the front-end read (GET /api?key=...)
///
/// A missing `key` deserializes to an empty string and is rejected by the
/// group as an invalid argument.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiQuery {
    /// The cache key to read
    #[serde(default)]
    pub key: String,
}
