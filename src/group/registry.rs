//! Registry Module
//!
//! Named lookup of the groups hosted by this process.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, warn};

use crate::group::Group;

// == Registry ==
/// The groups served by this node, keyed by name.
///
/// Built once at startup and shared with whatever needs to resolve a group
/// by name, such as the peer-protocol handler.
#[derive(Debug, Default)]
pub struct Registry {
    groups: RwLock<HashMap<String, Arc<Group>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    // == Register ==
    /// Adds a group, replacing any group with the same name.
    pub fn register(&self, group: Group) -> Arc<Group> {
        let group = Arc::new(group);
        let name = group.name().to_string();
        if self
            .groups
            .write()
            .insert(name.clone(), group.clone())
            .is_some()
        {
            warn!(group = %name, "replaced existing group");
        } else {
            info!(group = %name, "registered group");
        }
        group
    }

    // == Get ==
    pub fn get(&self, name: &str) -> Option<Arc<Group>> {
        self.groups.read().get(name).cloned()
    }

    // == Remove ==
    /// Drops a group; its cached entries go with the last reference to it.
    pub fn remove(&self, name: &str) -> Option<Arc<Group>> {
        self.groups.write().remove(name)
    }

    /// Registered group names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.groups.read().keys().cloned().collect();
        names.sort();
        names
    }
}
