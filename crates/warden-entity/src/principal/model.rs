//! Principal entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::status::PrincipalStatus;

/// An identity within a tenant, owned by the external identity store.
///
/// The engine only reads principals; it never writes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    /// Unique principal identifier.
    pub id: Uuid,
    /// Tenant this principal belongs to.
    pub tenant_id: Uuid,
    /// Home department, if assigned.
    pub dept_id: Option<Uuid>,
    /// Unique login name.
    pub username: String,
    /// Argon2id password hash (PHC string).
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Account status.
    pub status: PrincipalStatus,
    /// Soft-delete flag. Store reads exclude deleted rows; carried so the
    /// orchestrator can still fail closed on a stale row.
    pub deleted: bool,
    /// Assigned role ids.
    pub role_ids: Vec<Uuid>,
    /// When the principal was created.
    pub created_at: DateTime<Utc>,
}

impl Principal {
    /// Check if the principal can authenticate right now.
    pub fn can_login(&self) -> bool {
        self.status.can_login() && !self.deleted
    }
}
