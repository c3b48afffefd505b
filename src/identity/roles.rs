use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::error::{AppError, AppResult};

/// Closed set of access levels. The resource gate matches exhaustively on
/// this enum, so adding a role forces a review of every ownership rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Accountant,
    Bookkeeper,
    Client,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Accountant => "accountant",
            Role::Bookkeeper => "bookkeeper",
            Role::Client => "client",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a caller-supplied role string. Unknown strings are a 400, not a
/// deserialization failure, so the admin endpoint reports them cleanly.
pub fn parse_role(s: &str) -> AppResult<Role> {
    match s {
        "admin" => Ok(Role::Admin),
        "accountant" => Ok(Role::Accountant),
        "bookkeeper" => Ok(Role::Bookkeeper),
        "client" => Ok(Role::Client),
        other => Err(AppError::user("unknown_role", format!("unknown role: {}", other))),
    }
}
