use crate::error::{AppError, AppResult};
use crate::storage::Client;

use super::{Principal, Role};

/// Coarse allow-list gate for an operation, independent of which record is
/// targeted. Identity resolution happens before this runs, so a missing or
/// unknown caller has already failed with 401.
pub fn require_role(principal: &Principal, allowed: &[Role]) -> AppResult<()> {
    if allowed.contains(&principal.role) {
        Ok(())
    } else {
        Err(AppError::forbidden("role_not_allowed", "not enough permissions"))
    }
}

/// Ownership predicate shared by the resource gate and the client list
/// filter. First matching rule wins; the match is exhaustive over `Role`.
pub fn can_access(client: &Client, principal: &Principal) -> bool {
    match principal.role {
        Role::Admin => true,
        Role::Client => client.username == principal.username,
        Role::Bookkeeper => client.bookkeeper.as_deref() == Some(principal.username.as_str()),
        Role::Accountant => client.accountant.as_deref() == Some(principal.username.as_str()),
    }
}

/// Resource gate for endpoints scoped to one client record.
///
/// Callers resolve the record first, so a missing id surfaces as 404 before
/// any access decision. That ordering reveals which ids exist to every
/// authenticated caller; it is inherited behaviour, kept deliberately.
pub fn ensure_client_access(client: &Client, principal: &Principal) -> AppResult<()> {
    if can_access(client, principal) {
        Ok(())
    } else {
        Err(AppError::forbidden("client_access_denied", "not enough permissions"))
    }
}
