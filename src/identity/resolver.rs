use axum::http::HeaderMap;

use crate::error::{AppError, AppResult};

use super::{Principal, RoleRegistry};

/// Transport header carrying the caller-supplied username token.
pub const USER_HEADER: &str = "x-user";

/// Resolve the caller identity from request metadata.
///
/// The header carries only a username; the role is always derived from the
/// registry. A caller-supplied role is never accepted, so a request cannot
/// self-assert "admin".
pub fn resolve_identity(registry: &RoleRegistry, headers: &HeaderMap) -> AppResult<Principal> {
    let Some(value) = headers.get(USER_HEADER) else {
        return Err(AppError::auth("missing_identity", "missing x-user header"));
    };
    let username = value
        .to_str()
        .map_err(|_| AppError::auth("bad_identity", "x-user header is not valid UTF-8"))?;
    let Some(role) = registry.role_of(username) else {
        return Err(AppError::auth("unknown_user", format!("unknown user: {}", username)));
    };
    Ok(Principal { username: username.to_string(), role })
}
