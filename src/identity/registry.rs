use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use super::Role;

/// Bootstrap admin present before any request is served.
const SEED_ADMIN: &str = "admin";

/// Process-wide username -> role mapping.
///
/// The registry is injected into the server state at construction; cloning
/// clones the handle, not the map, so tests get isolation by building a
/// fresh registry instead of clearing shared globals.
#[derive(Clone)]
pub struct RoleRegistry {
    inner: Arc<RwLock<HashMap<String, Role>>>,
}

impl RoleRegistry {
    /// Create a registry seeded with the bootstrap admin.
    pub fn new() -> Self {
        let mut map = HashMap::new();
        map.insert(SEED_ADMIN.to_string(), Role::Admin);
        Self { inner: Arc::new(RwLock::new(map)) }
    }

    pub fn role_of(&self, username: &str) -> Option<Role> {
        self.inner.read().get(username).copied()
    }

    /// Assign a role, overwriting any existing mapping. Idempotent.
    pub fn assign(&self, username: &str, role: Role) {
        self.inner.write().insert(username.to_string(), role);
        info!(target: "ledgerd::identity", "role assigned: user='{}' role='{}'", username, role);
    }

    /// Register a newly created client username with `Role::Client` unless a
    /// mapping already exists. Never overrides a previously assigned role.
    pub fn register_client(&self, username: &str) {
        self.inner
            .write()
            .entry(username.to_string())
            .or_insert(Role::Client);
    }

    /// Snapshot of all mappings, sorted by username for stable listings.
    pub fn list(&self) -> Vec<(String, Role)> {
        let mut users: Vec<(String, Role)> = self
            .inner
            .read()
            .iter()
            .map(|(u, r)| (u.clone(), *r))
            .collect();
        users.sort_by(|a, b| a.0.cmp(&b.0));
        users
    }
}

impl Default for RoleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
