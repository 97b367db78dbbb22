//! Role entity and data-scope mode.

mod model;
mod scope;

pub use model::{Role, RoleStatus, SUPER_ADMIN_ROLE_ID, WILDCARD_PERMISSION};
pub use scope::DataScopeMode;
