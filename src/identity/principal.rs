use serde::{Deserialize, Serialize};

use super::Role;

/// A resolved caller identity: the username from the request token plus the
/// role derived server-side from the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub username: String,
    pub role: Role,
}
