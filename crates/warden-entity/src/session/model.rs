//! Session record entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Client metadata captured at login time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    /// Caller network address, as reported by the transport layer.
    pub address: Option<String>,
    /// User-Agent header value.
    pub user_agent: Option<String>,
    /// Device class ("desktop", "mobile", ...).
    pub device: Option<String>,
}

/// A live session held in the session store under a TTL.
///
/// A record exists in the store iff its session id has neither expired nor
/// been explicitly invalidated. The signed token a client holds is only a
/// capability to redeem against this record, never proof by itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Opaque, globally unique session identifier.
    pub session_id: Uuid,
    /// The principal this session belongs to.
    pub principal_id: Uuid,
    /// Tenant of the principal at login time.
    pub tenant_id: Uuid,
    /// When the session was issued.
    pub issued_at: DateTime<Utc>,
    /// Absolute expiry. The store derives the remaining TTL from this on
    /// merge so partial updates never silently reset the window.
    pub expires_at: DateTime<Utc>,
    /// Client metadata captured at login.
    pub client: ClientInfo,
    /// Role keys held at login or last permission refresh.
    pub role_keys: Vec<String>,
    /// Permission strings held at login or last permission refresh.
    pub permissions: Vec<String>,
    /// Free-form extension fields for host-application use.
    #[serde(default)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SessionRecord {
    /// Check whether the record has passed its absolute expiry.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    /// Remaining lifetime, `None` once expired.
    pub fn remaining_ttl(&self) -> Option<std::time::Duration> {
        (self.expires_at - Utc::now()).to_std().ok()
    }
}

/// A partial update applied to a session record via shallow merge.
///
/// `None` fields are left untouched; `extra` entries are merged key-by-key
/// on top of the existing map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionPatch {
    /// Replacement role-key list.
    pub role_keys: Option<Vec<String>>,
    /// Replacement permission list.
    pub permissions: Option<Vec<String>>,
    /// Replacement client metadata.
    pub client: Option<ClientInfo>,
    /// Extension fields to merge in.
    #[serde(default)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SessionPatch {
    /// Apply this patch on top of `record`, field by field.
    pub fn apply(self, record: &mut SessionRecord) {
        if let Some(role_keys) = self.role_keys {
            record.role_keys = role_keys;
        }
        if let Some(permissions) = self.permissions {
            record.permissions = permissions;
        }
        if let Some(client) = self.client {
            record.client = client;
        }
        for (key, value) in self.extra {
            record.extra.insert(key, value);
        }
    }
}
