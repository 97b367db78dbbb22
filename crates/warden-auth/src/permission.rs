//! Permission aggregation with a per-principal cache.
//!
//! The source expressed caching as method-level cache annotations; here it
//! is an explicit cache-aside wrapper with an eviction method that role and
//! assignment mutation paths call directly.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use uuid::Uuid;

use warden_cache::{CacheManager, keys};
use warden_core::result::AppResult;
use warden_core::traits::CacheProvider;
use warden_entity::{SUPER_ADMIN_ROLE_ID, WILDCARD_PERMISSION};

use crate::store::RoleStore;

/// Aggregates role ids into a deduplicated permission-string set.
#[derive(Clone)]
pub struct PermissionAggregator {
    /// Role/resource store collaborator.
    roles: Arc<dyn RoleStore>,
    /// Shared cache.
    cache: Arc<CacheManager>,
    /// TTL for cached permission sets.
    cache_ttl: Duration,
}

impl std::fmt::Debug for PermissionAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionAggregator").finish()
    }
}

impl PermissionAggregator {
    /// Creates a new aggregator.
    pub fn new(roles: Arc<dyn RoleStore>, cache: Arc<CacheManager>, cache_ttl: Duration) -> Self {
        Self {
            roles,
            cache,
            cache_ttl,
        }
    }

    /// Aggregate the permission strings granted by `role_ids`.
    ///
    /// The super-admin sentinel short-circuits to the wildcard with zero
    /// store lookups. Otherwise resources are fetched in one batched pass,
    /// blank entries dropped, and the result cached per principal.
    pub async fn aggregate(
        &self,
        principal_id: Uuid,
        role_ids: &[Uuid],
    ) -> AppResult<HashSet<String>> {
        if role_ids.contains(&SUPER_ADMIN_ROLE_ID) {
            return Ok(HashSet::from([WILDCARD_PERMISSION.to_string()]));
        }

        if role_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let cache_key = keys::permissions(principal_id);
        if let Some(cached) = self.cache.get_json::<Vec<String>>(&cache_key).await? {
            debug!(principal_id = %principal_id, "Permission cache hit");
            return Ok(cached.into_iter().collect());
        }

        let resource_ids = self.roles.find_role_resource_ids(role_ids).await?;
        let permissions: HashSet<String> = if resource_ids.is_empty() {
            HashSet::new()
        } else {
            self.roles
                .find_resource_permissions(&resource_ids)
                .await?
                .into_iter()
                .filter(|p| !p.trim().is_empty())
                .collect()
        };

        let as_vec: Vec<&String> = permissions.iter().collect();
        self.cache
            .set_json(&cache_key, &as_vec, self.cache_ttl)
            .await?;

        Ok(permissions)
    }

    /// Evict the cached permission set of a principal.
    ///
    /// Part of the public contract: role or resource assignment changes
    /// elsewhere in the system must call this. Idempotent: evicting an
    /// absent entry is a no-op.
    pub async fn evict(&self, principal_id: Uuid) -> AppResult<()> {
        self.cache.delete(&keys::permissions(principal_id)).await
    }

    /// Evict every cached permission set at once, for mutations whose blast
    /// radius is unbounded, such as editing the permissions of a shared
    /// resource. Returns the number of entries removed.
    pub async fn evict_all(&self) -> AppResult<u64> {
        let removed = self
            .cache
            .delete_pattern(keys::permissions_pattern())
            .await?;
        debug!(removed, "Evicted all cached permission sets");
        Ok(removed)
    }
}
