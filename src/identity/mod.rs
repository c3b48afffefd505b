//! Identity resolution and access control for ledgerd.
//! Keep the public surface thin and split implementation across sub-modules.

mod principal;
mod roles;
mod registry;
mod resolver;
mod policy;

pub use principal::Principal;
pub use roles::{Role, parse_role};
pub use registry::RoleRegistry;
pub use resolver::{USER_HEADER, resolve_identity};
pub use policy::{can_access, ensure_client_access, require_role};
