//! Request and Response models for the HTTP endpoints
//!
//! The peer protocol itself speaks raw bytes; these DTOs cover the JSON
//! admin endpoints and the front-end query string.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::ApiQuery;
pub use responses::{GroupStatsResponse, HealthResponse, StatsResponse};
