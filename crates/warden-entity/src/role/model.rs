//! Role entity model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::scope::DataScopeMode;

/// Reserved super-administrator role id.
///
/// A principal holding this role bypasses permission aggregation entirely
/// and receives [`WILDCARD_PERMISSION`] without any store lookup.
pub const SUPER_ADMIN_ROLE_ID: Uuid = Uuid::from_u128(1);

/// The wildcard permission granted to the super-administrator role.
pub const WILDCARD_PERMISSION: &str = "*:*:*";

/// A role within a tenant, owned by the external role store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    /// Unique role identifier.
    pub id: Uuid,
    /// Tenant this role belongs to.
    pub tenant_id: Uuid,
    /// Stable role key (e.g. `"ops_manager"`), carried into session records.
    pub key: String,
    /// Data-scope mode controlling which records holders may see.
    pub data_scope: DataScopeMode,
    /// Role status.
    pub status: RoleStatus,
    /// Soft-delete flag.
    pub deleted: bool,
}

impl Role {
    /// A role contributes to scope/permission resolution only while enabled
    /// and not soft-deleted.
    pub fn is_effective(&self) -> bool {
        self.status == RoleStatus::Enabled && !self.deleted
    }
}

/// Role status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleStatus {
    /// Role is enabled.
    Enabled,
    /// Role is disabled and contributes nothing.
    Disabled,
}
