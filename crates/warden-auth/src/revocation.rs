//! Token-version counters and the session deny-list.
//!
//! Two independent revocation mechanisms:
//!
//! - the per-principal token version invalidates every token minted before a
//!   bump without enumerating them (password change, credential rotation);
//! - the per-session deny-list invalidates one session (admin-forced logout)
//!   without touching the principal's other sessions.
//!
//! A signed token is accepted only if both checks pass.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use uuid::Uuid;

use warden_cache::{CacheManager, keys};
use warden_core::result::AppResult;
use warden_core::traits::CacheProvider;

/// Maintains revocation state in the shared cache.
#[derive(Debug, Clone)]
pub struct RevocationService {
    /// Shared cache.
    cache: Arc<CacheManager>,
    /// TTL for deny-list entries; must cover the maximum token lifetime.
    deny_list_ttl: Duration,
}

impl RevocationService {
    /// Creates a new revocation service.
    pub fn new(cache: Arc<CacheManager>, deny_list_ttl: Duration) -> Self {
        Self {
            cache,
            deny_list_ttl,
        }
    }

    /// Current token version for a principal. Defaults to 0 if never bumped.
    pub async fn current_version(&self, principal_id: Uuid) -> AppResult<i64> {
        let value = self.cache.get(&keys::token_version(principal_id)).await?;
        Ok(value.and_then(|v| v.parse().ok()).unwrap_or(0))
    }

    /// Atomically bump the token version, invalidating every token minted
    /// before the bump. The counter never expires.
    pub async fn bump_version(&self, principal_id: Uuid) -> AppResult<()> {
        let version = self.cache.incr(&keys::token_version(principal_id)).await?;
        info!(principal_id = %principal_id, version, "Token version bumped");
        Ok(())
    }

    /// Add a session to the deny-list.
    pub async fn revoke_session(&self, session_id: Uuid) -> AppResult<()> {
        self.cache
            .set(&keys::session_denied(session_id), "revoked", self.deny_list_ttl)
            .await?;
        info!(session_id = %session_id, "Session deny-listed");
        Ok(())
    }

    /// Check deny-list membership.
    pub async fn is_session_revoked(&self, session_id: Uuid) -> AppResult<bool> {
        self.cache.exists(&keys::session_denied(session_id)).await
    }
}
