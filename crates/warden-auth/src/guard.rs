//! Brute-force lockout guard.
//!
//! Per-identity state machine over two cache keys: a failure counter with a
//! sliding window TTL, and a lock marker whose TTL is the lockout duration
//! and whose value records the lock expiry. Release is implicit: the lock
//! key expires; there is no explicit unlock transition.
//!
//! The counter uses the cache provider's atomic `incr`, so two simultaneous
//! wrong-password submissions are both counted. The lock marker is written
//! with `set_nx`, so a concurrent failure while already locked neither
//! resets nor extends the lock.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::warn;

use warden_cache::{CacheManager, keys};
use warden_core::config::auth::AuthConfig;
use warden_core::result::AppResult;
use warden_core::traits::CacheProvider;

use crate::outcome::DenyReason;

/// Result of recording a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailureOutcome {
    /// Whether the identity is now locked.
    pub locked: bool,
    /// Attempts left before lockout (0 when locked).
    pub remaining_attempts: i64,
}

/// Tracks consecutive authentication failures and enforces a timed lockout.
#[derive(Debug, Clone)]
pub struct LoginGuard {
    /// Shared cache.
    cache: Arc<CacheManager>,
    /// Failures allowed before lockout.
    threshold: i64,
    /// Window during which consecutive failures accumulate.
    window: Duration,
    /// Lockout duration once the threshold is hit.
    lockout: Duration,
}

impl LoginGuard {
    /// Creates a new guard from auth configuration.
    pub fn new(cache: Arc<CacheManager>, config: &AuthConfig) -> Self {
        Self::with_windows(
            cache,
            config.max_failed_attempts,
            Duration::from_secs(config.failure_window_minutes * 60),
            Duration::from_secs(config.lockout_duration_minutes * 60),
        )
    }

    /// Creates a guard with explicit window durations.
    pub fn with_windows(
        cache: Arc<CacheManager>,
        threshold: i64,
        window: Duration,
        lockout: Duration,
    ) -> Self {
        Self {
            cache,
            threshold,
            window,
            lockout,
        }
    }

    /// Pre-attempt check. A locked identity is rejected with the remaining
    /// lock time in the message, never the attempt count.
    pub async fn check(&self, identity: &str) -> AppResult<()> {
        if let Some(expiry) = self.lock_expiry(identity).await? {
            let remaining = (expiry - Utc::now()).num_seconds().max(0);
            let minutes = remaining / 60 + i64::from(remaining % 60 != 0);
            return Err(DenyReason::AccountLocked { minutes }.into_error());
        }
        Ok(())
    }

    /// Record one failed attempt atomically. A no-op while already locked.
    pub async fn record_failure(&self, identity: &str) -> AppResult<FailureOutcome> {
        if self.lock_expiry(identity).await?.is_some() {
            return Ok(FailureOutcome {
                locked: true,
                remaining_attempts: 0,
            });
        }

        let counter_key = keys::lockout_attempts(identity);
        let count = self.cache.incr(&counter_key).await?;
        if count == 1 {
            self.cache.expire(&counter_key, self.window).await?;
        }

        if count >= self.threshold {
            let expiry = Utc::now() + chrono::Duration::seconds(self.lockout.as_secs() as i64);
            // NX: a racing failure that also reached the threshold must not
            // extend a lock another caller just created.
            self.cache
                .set_nx(&keys::lockout_lock(identity), &expiry.to_rfc3339(), self.lockout)
                .await?;
            self.cache.delete(&counter_key).await?;
            warn!(identity, attempts = count, "Identity locked out");
            return Ok(FailureOutcome {
                locked: true,
                remaining_attempts: 0,
            });
        }

        Ok(FailureOutcome {
            locked: false,
            remaining_attempts: self.threshold - count,
        })
    }

    /// Reset the failure counter on successful authentication. Idempotent.
    pub async fn clear(&self, identity: &str) -> AppResult<()> {
        self.cache.delete(&keys::lockout_attempts(identity)).await
    }

    /// The lock expiry if the identity is currently locked.
    async fn lock_expiry(&self, identity: &str) -> AppResult<Option<DateTime<Utc>>> {
        let value = self.cache.get(&keys::lockout_lock(identity)).await?;
        Ok(value
            .as_deref()
            .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
            .map(|dt| dt.with_timezone(&Utc)))
    }
}
