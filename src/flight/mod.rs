//! Flight Module
//!
//! Duplicate-call suppression for cache loads.

mod single_flight;

pub use single_flight::SingleFlight;
