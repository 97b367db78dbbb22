//! Collaborator store traits.
//!
//! The identity, role/resource, and department stores are owned by the host
//! application (database-backed in production, in-memory in tests). Every
//! read excludes soft-deleted rows; that filter is part of the contract,
//! not something callers re-check.

use async_trait::async_trait;
use uuid::Uuid;

use warden_core::result::AppResult;
use warden_entity::{Department, Principal, Role};

/// Read access to principals.
#[async_trait]
pub trait IdentityStore: Send + Sync + 'static {
    /// Find a principal by login name. Excludes soft-deleted rows.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<Principal>>;

    /// Find a principal by id. Excludes soft-deleted rows.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Principal>>;
}

/// Read access to roles and the role→resource / role→department mappings.
#[async_trait]
pub trait RoleStore: Send + Sync + 'static {
    /// Fetch the given roles in one batched lookup. Excludes soft-deleted
    /// rows; disabled roles are returned and filtered by the caller.
    async fn find_roles(&self, ids: &[Uuid]) -> AppResult<Vec<Role>>;

    /// Resource ids reachable from the given roles, batched.
    async fn find_role_resource_ids(&self, role_ids: &[Uuid]) -> AppResult<Vec<Uuid>>;

    /// Permission strings of the given active, non-deleted resources,
    /// batched. May contain duplicates and empty strings; callers dedupe.
    async fn find_resource_permissions(&self, resource_ids: &[Uuid]) -> AppResult<Vec<String>>;

    /// Department ids associated with the given custom-scope roles, batched.
    async fn find_role_department_ids(&self, role_ids: &[Uuid]) -> AppResult<Vec<Uuid>>;
}

/// Read access to a tenant's department forest.
#[async_trait]
pub trait DepartmentStore: Send + Sync + 'static {
    /// All non-deleted departments of a tenant, with ancestry paths.
    async fn find_all(&self, tenant_id: Uuid) -> AppResult<Vec<Department>>;
}
