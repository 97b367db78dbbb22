//! TTL-backed session store with partial merge-updates.
//!
//! Records are JSON blobs in the shared cache keyed by session id. A merge
//! is a read-modify-write; since the cache trait has no per-field hash
//! primitive, merges are serialized per session id with a short-lived async
//! lock instead. Merges to *different* sessions never contend.
//!
//! Merge preserves the remaining TTL, recomputed from the record's own
//! `expires_at`. Only `put` starts a fresh window.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use warden_cache::{CacheManager, keys};
use warden_core::error::AppError;
use warden_core::result::AppResult;
use warden_core::traits::CacheProvider;
use warden_entity::{SessionPatch, SessionRecord};

/// Shared, TTL-backed session record store.
#[derive(Clone)]
pub struct SessionStore {
    /// Shared cache.
    cache: Arc<CacheManager>,
    /// Per-session merge locks, pruned once uncontended.
    merge_locks: Arc<DashMap<Uuid, Arc<Mutex<()>>>>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("merge_locks", &self.merge_locks.len())
            .finish()
    }
}

impl SessionStore {
    /// Creates a new session store.
    pub fn new(cache: Arc<CacheManager>) -> Self {
        Self {
            cache,
            merge_locks: Arc::new(DashMap::new()),
        }
    }

    /// Write a record under a fresh TTL window. The record's `expires_at`
    /// must already reflect that window.
    pub async fn put(&self, record: &SessionRecord, ttl: Duration) -> AppResult<()> {
        self.cache
            .set_json(&keys::session(record.session_id), record, ttl)
            .await
    }

    /// Fetch a live record. A record past its own `expires_at` is treated
    /// as absent even if the cache has not swept it yet.
    pub async fn get(&self, session_id: Uuid) -> AppResult<Option<SessionRecord>> {
        let record: Option<SessionRecord> =
            self.cache.get_json(&keys::session(session_id)).await?;
        Ok(record.filter(|r| !r.is_expired()))
    }

    /// Shallow-merge `patch` into the record, keeping the remaining TTL.
    ///
    /// Returns the merged record, or an error if the session is gone.
    pub async fn merge(&self, session_id: Uuid, patch: SessionPatch) -> AppResult<SessionRecord> {
        let lock = self
            .merge_locks
            .entry(session_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let guard = lock.lock().await;

        let result = self.merge_locked(session_id, patch).await;

        drop(guard);
        // Opportunistic pruning: drop the lock entry once nobody else holds it.
        self.merge_locks
            .remove_if(&session_id, |_, l| Arc::strong_count(l) <= 2);

        result
    }

    async fn merge_locked(
        &self,
        session_id: Uuid,
        patch: SessionPatch,
    ) -> AppResult<SessionRecord> {
        let mut record = self
            .get(session_id)
            .await?
            .ok_or_else(|| AppError::not_found("Session not found"))?;

        patch.apply(&mut record);

        let remaining = record
            .remaining_ttl()
            .ok_or_else(|| AppError::not_found("Session not found"))?;

        self.cache
            .set_json(&keys::session(session_id), &record, remaining)
            .await?;

        debug!(session_id = %session_id, "Session merged");
        Ok(record)
    }

    /// Destroy a session record. Deleting an absent session is a no-op.
    pub async fn delete(&self, session_id: Uuid) -> AppResult<()> {
        self.cache.delete(&keys::session(session_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use warden_cache::memory::MemoryCacheProvider;
    use warden_core::config::cache::MemoryCacheConfig;
    use warden_entity::ClientInfo;

    fn store() -> SessionStore {
        let provider = MemoryCacheProvider::new(&MemoryCacheConfig { max_capacity: 100 });
        SessionStore::new(Arc::new(CacheManager::from_provider(Arc::new(provider))))
    }

    fn record(ttl: Duration) -> SessionRecord {
        let now = Utc::now();
        SessionRecord {
            session_id: Uuid::new_v4(),
            principal_id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            issued_at: now,
            expires_at: now + chrono::Duration::from_std(ttl).unwrap(),
            client: ClientInfo::default(),
            role_keys: vec!["viewer".into()],
            permissions: vec!["doc:read".into()],
            extra: serde_json::Map::new(),
        }
    }

    #[tokio::test]
    async fn put_get_delete_lifecycle() {
        let store = store();
        let rec = record(Duration::from_secs(60));
        let sid = rec.session_id;

        store.put(&rec, Duration::from_secs(60)).await.unwrap();
        assert!(store.get(sid).await.unwrap().is_some());

        store.delete(sid).await.unwrap();
        assert!(store.get(sid).await.unwrap().is_none());

        // Deleting again is a no-op.
        store.delete(sid).await.unwrap();
    }

    #[tokio::test]
    async fn merge_updates_fields_and_preserves_expiry() {
        let store = store();
        let rec = record(Duration::from_secs(60));
        let sid = rec.session_id;
        let original_expiry = rec.expires_at;
        store.put(&rec, Duration::from_secs(60)).await.unwrap();

        let merged = store
            .merge(
                sid,
                SessionPatch {
                    permissions: Some(vec!["doc:read".into(), "doc:write".into()]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(merged.permissions.len(), 2);
        assert_eq!(merged.role_keys, vec!["viewer".to_string()]);
        assert_eq!(merged.expires_at, original_expiry);

        let stored = store.get(sid).await.unwrap().unwrap();
        assert_eq!(stored.expires_at, original_expiry);
    }

    #[tokio::test]
    async fn merge_into_missing_session_errors() {
        let store = store();
        let err = store
            .merge(Uuid::new_v4(), SessionPatch::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, warden_core::error::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn expired_record_is_absent_before_sweep() {
        let store = store();
        let mut rec = record(Duration::from_secs(60));
        rec.expires_at = Utc::now() - chrono::Duration::seconds(1);
        // Cache TTL is still generous; the record's own expiry governs.
        store.put(&rec, Duration::from_secs(60)).await.unwrap();
        assert!(store.get(rec.session_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn concurrent_merges_lose_no_fields() {
        let store = Arc::new(store());
        let rec = record(Duration::from_secs(60));
        let sid = rec.session_id;
        store.put(&rec, Duration::from_secs(60)).await.unwrap();

        let s1 = Arc::clone(&store);
        let a = tokio::spawn(async move {
            s1.merge(
                sid,
                SessionPatch {
                    permissions: Some(vec!["doc:write".into()]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        });

        let s2 = Arc::clone(&store);
        let b = tokio::spawn(async move {
            s2.merge(
                sid,
                SessionPatch {
                    client: Some(ClientInfo {
                        address: Some("10.0.0.9".into()),
                        ..Default::default()
                    }),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        });

        a.await.unwrap();
        b.await.unwrap();

        let stored = store.get(sid).await.unwrap().unwrap();
        assert_eq!(stored.permissions, vec!["doc:write".to_string()]);
        assert_eq!(stored.client.address.as_deref(), Some("10.0.0.9"));
    }
}
