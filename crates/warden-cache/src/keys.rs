//! Cache key builders for all Warden cache entries.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the engine uses.

use uuid::Uuid;

// ── Session keys ───────────────────────────────────────────

/// Cache key for a session record by id.
pub fn session(session_id: Uuid) -> String {
    format!("session:{session_id}")
}

/// Cache key for the deny-list entry of a revoked session.
pub fn session_denied(session_id: Uuid) -> String {
    format!("session:deny:{session_id}")
}

// ── Revocation keys ────────────────────────────────────────

/// Cache key for a principal's token-version counter. No expiry: the value
/// persists until the next bump or principal deletion.
pub fn token_version(principal_id: Uuid) -> String {
    format!("token:version:{principal_id}")
}

// ── Lockout keys ───────────────────────────────────────────

/// Cache key for the consecutive-failure counter of an identity.
pub fn lockout_attempts(identity: &str) -> String {
    format!("lockout:attempts:{}", identity.to_lowercase())
}

/// Cache key of the lock marker for a locked-out identity. The value holds
/// the lock expiry timestamp; the TTL equals the lockout duration.
pub fn lockout_lock(identity: &str) -> String {
    format!("lockout:locked:{}", identity.to_lowercase())
}

// ── Permission keys ────────────────────────────────────────

/// Cache key for the aggregated permission set of a principal.
pub fn permissions(principal_id: Uuid) -> String {
    format!("perm:agg:{principal_id}")
}

/// Glob matching every aggregated permission set, for bulk eviction.
pub fn permissions_pattern() -> &'static str {
    "perm:agg:*"
}
