//! In-memory cache implementation using the moka crate.
//!
//! Values live in a moka cache with per-entry TTL. Counters live in a
//! separate dashmap so `incr` is atomic under the per-key entry lock;
//! counter keys and value keys are disjoint namespaces (see `keys`).

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use moka::Expiry;
use moka::future::Cache;
use tracing::debug;

use warden_core::config::cache::MemoryCacheConfig;
use warden_core::result::AppResult;
use warden_core::traits::cache::CacheProvider;

/// A cached value with its own TTL.
#[derive(Debug, Clone)]
struct Entry {
    value: String,
    ttl: Duration,
}

/// Per-entry expiry policy driven by [`Entry::ttl`].
struct PerEntryExpiry;

impl Expiry<String, Entry> for PerEntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// An integer counter with an optional expiry window.
#[derive(Debug)]
struct Counter {
    value: i64,
    expires_at: Option<Instant>,
}

impl Counter {
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at <= Instant::now())
    }
}

/// In-memory cache provider for single-node deployments.
#[derive(Debug, Clone)]
pub struct MemoryCacheProvider {
    /// String values with per-entry TTL.
    cache: Cache<String, Entry>,
    /// Counters mutated under the dashmap entry lock.
    counters: Arc<DashMap<String, Counter>>,
}

impl MemoryCacheProvider {
    /// Create a new in-memory cache from configuration.
    pub fn new(config: &MemoryCacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_capacity)
            .expire_after(PerEntryExpiry)
            .build();

        Self {
            cache,
            counters: Arc::new(DashMap::new()),
        }
    }
}

#[async_trait]
impl CacheProvider for MemoryCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        if let Some(counter) = self.counters.get(key) {
            if !counter.is_expired() {
                return Ok(Some(counter.value.to_string()));
            }
            drop(counter);
            self.counters.remove(key);
        }
        Ok(self.cache.get(key).await.map(|entry| entry.value))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        self.counters.remove(key);
        self.cache
            .insert(
                key.to_string(),
                Entry {
                    value: value.to_string(),
                    ttl,
                },
            )
            .await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.cache.remove(key).await;
        self.counters.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.get(key).await?.is_some())
    }

    async fn delete_pattern(&self, pattern: &str) -> AppResult<u64> {
        // Moka has no pattern scan; treat the pattern as a prefix glob.
        let prefix = pattern.trim_end_matches('*');
        let mut count = 0u64;

        let keys_to_remove: Vec<String> = self
            .cache
            .iter()
            .filter(|entry| entry.0.starts_with(prefix))
            .map(|entry| entry.0.to_string())
            .collect();

        for key in keys_to_remove {
            self.cache.remove(&key).await;
            count += 1;
        }

        let counter_keys: Vec<String> = self
            .counters
            .iter()
            .filter(|entry| entry.key().starts_with(prefix))
            .map(|entry| entry.key().clone())
            .collect();

        for key in counter_keys {
            self.counters.remove(&key);
            count += 1;
        }

        debug!(pattern, count, "Deleted keys matching pattern");
        Ok(count)
    }

    async fn set_nx(&self, key: &str, value: &str, ttl: Duration) -> AppResult<bool> {
        // get-then-insert; two racing writers on this single-node backend
        // may both observe absence.
        if self.exists(key).await? {
            return Ok(false);
        }
        self.set(key, value, ttl).await?;
        Ok(true)
    }

    async fn incr(&self, key: &str) -> AppResult<i64> {
        let mut counter = self.counters.entry(key.to_string()).or_insert(Counter {
            value: 0,
            expires_at: None,
        });
        if counter.is_expired() {
            counter.value = 0;
            counter.expires_at = None;
        }
        counter.value += 1;
        Ok(counter.value)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool> {
        if let Some(mut counter) = self.counters.get_mut(key) {
            if !counter.is_expired() {
                counter.expires_at = Some(Instant::now() + ttl);
                return Ok(true);
            }
        }
        if let Some(entry) = self.cache.get(key).await {
            self.cache
                .insert(
                    key.to_string(),
                    Entry {
                        value: entry.value,
                        ttl,
                    },
                )
                .await;
            return Ok(true);
        }
        Ok(false)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
