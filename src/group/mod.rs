//! Group Module
//!
//! Cache namespaces, their source-of-truth loaders, and the registry that
//! resolves them by name.

mod getter;
#[allow(clippy::module_inception)]
mod group;
mod registry;
mod stats;

pub use getter::{Getter, GetterFunc};
pub use group::Group;
pub use registry::Registry;
pub use stats::{GroupStats, GroupStatsSnapshot};
