//! Shared test helpers: in-memory collaborator stores and an engine builder.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use warden_auth::{
    AuthManager, DataScopeResolver, DepartmentStore, DeptHierarchyResolver, IdentityStore,
    LoginGuard, PasswordHasher, PermissionAggregator, RevocationService, RoleStore, SessionStore,
    TokenIssuer, TokenVerifier,
};
use warden_cache::CacheManager;
use warden_cache::memory::MemoryCacheProvider;
use warden_core::config::auth::AuthConfig;
use warden_core::config::cache::MemoryCacheConfig;
use warden_core::config::session::SessionConfig;
use warden_core::result::AppResult;
use warden_core::traits::CacheProvider;
use warden_entity::{
    ClientInfo, DataScopeMode, Department, Principal, PrincipalStatus, Role, RoleStatus,
};

/// In-memory identity store. Returns rows exactly as seeded, including
/// soft-deleted ones, so tests can exercise the orchestrator's own
/// fail-closed checks against stale reads.
pub struct FixtureIdentityStore {
    principals: Mutex<Vec<Principal>>,
}

impl FixtureIdentityStore {
    pub fn new(principals: Vec<Principal>) -> Arc<Self> {
        Arc::new(Self {
            principals: Mutex::new(principals),
        })
    }

    /// Soft-delete a seeded principal in place.
    pub fn mark_deleted(&self, id: Uuid) {
        for p in self.principals.lock().unwrap().iter_mut() {
            if p.id == id {
                p.deleted = true;
            }
        }
    }
}

#[async_trait]
impl IdentityStore for FixtureIdentityStore {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<Principal>> {
        Ok(self
            .principals
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.username == username)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Principal>> {
        Ok(self
            .principals
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }
}

/// In-memory role/resource store with a lookup counter, so tests can assert
/// how many times the resource-permission path was actually hit.
pub struct FixtureRoleStore {
    roles: Mutex<HashMap<Uuid, Role>>,
    /// role id -> resource ids
    resources: Mutex<HashMap<Uuid, Vec<Uuid>>>,
    /// resource id -> permission strings
    permissions: Mutex<HashMap<Uuid, Vec<String>>>,
    /// custom-scope role id -> department ids
    custom_departments: Mutex<HashMap<Uuid, Vec<Uuid>>>,
    /// Number of `find_resource_permissions` calls served.
    pub permission_lookups: AtomicUsize,
}

impl FixtureRoleStore {
    pub fn new(roles: Vec<Role>) -> Arc<Self> {
        Arc::new(Self {
            roles: Mutex::new(roles.into_iter().map(|r| (r.id, r)).collect()),
            resources: Mutex::new(HashMap::new()),
            permissions: Mutex::new(HashMap::new()),
            custom_departments: Mutex::new(HashMap::new()),
            permission_lookups: AtomicUsize::new(0),
        })
    }

    /// Attach a resource carrying `perms` to `role_id`.
    pub fn grant(&self, role_id: Uuid, perms: &[&str]) -> Uuid {
        let resource_id = Uuid::new_v4();
        self.resources
            .lock()
            .unwrap()
            .entry(role_id)
            .or_default()
            .push(resource_id);
        self.permissions
            .lock()
            .unwrap()
            .insert(resource_id, perms.iter().map(|p| p.to_string()).collect());
        resource_id
    }

    /// Replace the permission strings of an existing resource.
    pub fn regrant(&self, resource_id: Uuid, perms: &[&str]) {
        self.permissions
            .lock()
            .unwrap()
            .insert(resource_id, perms.iter().map(|p| p.to_string()).collect());
    }

    /// Associate departments with a custom-scope role.
    pub fn scope_departments(&self, role_id: Uuid, dept_ids: &[Uuid]) {
        self.custom_departments
            .lock()
            .unwrap()
            .insert(role_id, dept_ids.to_vec());
    }

    pub fn lookup_count(&self) -> usize {
        self.permission_lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RoleStore for FixtureRoleStore {
    async fn find_roles(&self, ids: &[Uuid]) -> AppResult<Vec<Role>> {
        let roles = self.roles.lock().unwrap();
        Ok(ids.iter().filter_map(|id| roles.get(id).cloned()).collect())
    }

    async fn find_role_resource_ids(&self, role_ids: &[Uuid]) -> AppResult<Vec<Uuid>> {
        let resources = self.resources.lock().unwrap();
        Ok(role_ids
            .iter()
            .flat_map(|id| resources.get(id).cloned().unwrap_or_default())
            .collect())
    }

    async fn find_resource_permissions(&self, resource_ids: &[Uuid]) -> AppResult<Vec<String>> {
        self.permission_lookups.fetch_add(1, Ordering::SeqCst);
        let permissions = self.permissions.lock().unwrap();
        Ok(resource_ids
            .iter()
            .flat_map(|id| permissions.get(id).cloned().unwrap_or_default())
            .collect())
    }

    async fn find_role_department_ids(&self, role_ids: &[Uuid]) -> AppResult<Vec<Uuid>> {
        let custom = self.custom_departments.lock().unwrap();
        Ok(role_ids
            .iter()
            .flat_map(|id| custom.get(id).cloned().unwrap_or_default())
            .collect())
    }
}

/// In-memory department store with a call counter.
pub struct FixtureDepartmentStore {
    departments: Vec<Department>,
    pub calls: AtomicUsize,
}

impl FixtureDepartmentStore {
    pub fn new(departments: Vec<Department>) -> Arc<Self> {
        Arc::new(Self {
            departments,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DepartmentStore for FixtureDepartmentStore {
    async fn find_all(&self, tenant_id: Uuid) -> AppResult<Vec<Department>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .departments
            .iter()
            .filter(|d| d.tenant_id == tenant_id && !d.deleted)
            .cloned()
            .collect())
    }
}

/// Wraps the in-memory provider and delays every operation, for exercising
/// the verify-path time budget.
#[derive(Debug)]
pub struct SlowCacheProvider {
    inner: MemoryCacheProvider,
    delay: Duration,
}

impl SlowCacheProvider {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: MemoryCacheProvider::new(&MemoryCacheConfig::default()),
            delay,
        }
    }
}

#[async_trait]
impl CacheProvider for SlowCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        tokio::time::sleep(self.delay).await;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        tokio::time::sleep(self.delay).await;
        self.inner.set(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        tokio::time::sleep(self.delay).await;
        self.inner.delete(key).await
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        tokio::time::sleep(self.delay).await;
        self.inner.exists(key).await
    }

    async fn delete_pattern(&self, pattern: &str) -> AppResult<u64> {
        tokio::time::sleep(self.delay).await;
        self.inner.delete_pattern(pattern).await
    }

    async fn set_nx(&self, key: &str, value: &str, ttl: Duration) -> AppResult<bool> {
        tokio::time::sleep(self.delay).await;
        self.inner.set_nx(key, value, ttl).await
    }

    async fn incr(&self, key: &str) -> AppResult<i64> {
        tokio::time::sleep(self.delay).await;
        self.inner.incr(key).await
    }

    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool> {
        tokio::time::sleep(self.delay).await;
        self.inner.expire(key, ttl).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}

/// Fully wired engine over in-memory fixtures.
pub struct TestEngine {
    pub manager: AuthManager,
    pub identities: Arc<FixtureIdentityStore>,
    pub roles: Arc<FixtureRoleStore>,
    pub departments: Arc<FixtureDepartmentStore>,
    pub scopes: DataScopeResolver,
}

impl TestEngine {
    pub fn build(
        identities: Arc<FixtureIdentityStore>,
        roles: Arc<FixtureRoleStore>,
        departments: Arc<FixtureDepartmentStore>,
        auth_config: AuthConfig,
    ) -> Self {
        let cache = Arc::new(CacheManager::from_provider(Arc::new(
            MemoryCacheProvider::new(&MemoryCacheConfig::default()),
        )));
        Self::build_with_cache(identities, roles, departments, auth_config, cache)
    }

    pub fn build_with_cache(
        identities: Arc<FixtureIdentityStore>,
        roles: Arc<FixtureRoleStore>,
        departments: Arc<FixtureDepartmentStore>,
        auth_config: AuthConfig,
        cache: Arc<CacheManager>,
    ) -> Self {
        let guard = LoginGuard::new(cache.clone(), &auth_config);
        Self::wire(identities, roles, departments, auth_config, cache, guard)
    }

    /// Engine with a sub-second lockout so tests can wait out the lock.
    pub fn build_with_lockout(
        identities: Arc<FixtureIdentityStore>,
        roles: Arc<FixtureRoleStore>,
        departments: Arc<FixtureDepartmentStore>,
        auth_config: AuthConfig,
        threshold: i64,
        window: Duration,
        lockout: Duration,
    ) -> Self {
        let cache = Arc::new(CacheManager::from_provider(Arc::new(
            MemoryCacheProvider::new(&MemoryCacheConfig::default()),
        )));
        let guard = LoginGuard::with_windows(cache.clone(), threshold, window, lockout);
        Self::wire(identities, roles, departments, auth_config, cache, guard)
    }

    fn wire(
        identities: Arc<FixtureIdentityStore>,
        roles: Arc<FixtureRoleStore>,
        departments: Arc<FixtureDepartmentStore>,
        auth_config: AuthConfig,
        cache: Arc<CacheManager>,
        guard: LoginGuard,
    ) -> Self {
        let session_config = SessionConfig::default();

        let hierarchy = DeptHierarchyResolver::new(departments.clone());
        let scopes = DataScopeResolver::new(roles.clone(), hierarchy);

        let manager = AuthManager::new(
            identities.clone(),
            roles.clone(),
            TokenIssuer::new(&auth_config),
            TokenVerifier::new(&auth_config),
            SessionStore::new(cache.clone()),
            RevocationService::new(
                cache.clone(),
                Duration::from_secs(session_config.deny_list_ttl_hours * 3600),
            ),
            guard,
            PermissionAggregator::new(roles.clone(), cache.clone(), Duration::from_secs(300)),
            scopes.clone(),
            &auth_config,
            &session_config,
        );

        Self {
            manager,
            identities,
            roles,
            departments,
            scopes,
        }
    }
}

pub fn client() -> ClientInfo {
    ClientInfo {
        address: Some("127.0.0.1".to_string()),
        user_agent: Some("integration-tests".to_string()),
        device: Some("desktop".to_string()),
    }
}

pub fn hash(password: &str) -> String {
    PasswordHasher::new()
        .hash_password(password)
        .expect("hashing test password")
}

pub fn principal(
    tenant_id: Uuid,
    username: &str,
    password: &str,
    role_ids: Vec<Uuid>,
) -> Principal {
    Principal {
        id: Uuid::new_v4(),
        tenant_id,
        dept_id: None,
        username: username.to_string(),
        password_hash: hash(password),
        status: PrincipalStatus::Active,
        deleted: false,
        role_ids,
        created_at: Utc::now(),
    }
}

pub fn role(tenant_id: Uuid, key: &str, data_scope: DataScopeMode) -> Role {
    Role {
        id: Uuid::new_v4(),
        tenant_id,
        key: key.to_string(),
        data_scope,
        status: RoleStatus::Enabled,
        deleted: false,
    }
}

pub fn department(tenant_id: Uuid, id: Uuid, parent: Option<&Department>) -> Department {
    let (parent_id, ancestors) = match parent {
        Some(p) => {
            let mut path = p.ancestors.clone();
            path.push(p.id);
            (Some(p.id), path)
        }
        None => (None, Vec::new()),
    };
    Department {
        id,
        tenant_id,
        parent_id,
        ancestors,
        enabled: true,
        deleted: false,
    }
}
