//! Role-set to predicate resolution.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use warden_core::result::AppResult;
use warden_entity::{DataScopeMode, Principal};

use crate::store::RoleStore;

use super::hierarchy::DeptHierarchyResolver;
use super::DataScope;

/// Converts a principal's role list into a [`DataScope`] predicate.
///
/// The role list is processed in a single pass into three buckets with an
/// early exit on `All`. Scopes union across roles: a role granting broader
/// access still grants it even if another role is more restrictive.
#[derive(Clone)]
pub struct DataScopeResolver {
    /// Role store collaborator.
    roles: Arc<dyn RoleStore>,
    /// Hierarchy walker for dept-rooted modes.
    hierarchy: DeptHierarchyResolver,
}

impl std::fmt::Debug for DataScopeResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataScopeResolver").finish()
    }
}

impl DataScopeResolver {
    /// Creates a new data-scope resolver.
    pub fn new(roles: Arc<dyn RoleStore>, hierarchy: DeptHierarchyResolver) -> Self {
        Self { roles, hierarchy }
    }

    /// Resolve the predicate for `principal`.
    pub async fn resolve(&self, principal: &Principal) -> AppResult<DataScope> {
        let roles = self.roles.find_roles(&principal.role_ids).await?;

        let mut custom_role_ids: Vec<Uuid> = Vec::new();
        let mut dept_modes: HashSet<DataScopeMode> = HashSet::new();
        let mut has_self = false;

        for role in roles.iter().filter(|r| r.is_effective()) {
            match role.data_scope {
                // Short-circuit: remaining roles cannot narrow this.
                DataScopeMode::All => return Ok(DataScope::Unrestricted),
                DataScopeMode::Custom => custom_role_ids.push(role.id),
                // Dedupe by mode so N roles of the same mode cost one walk.
                DataScopeMode::Dept | DataScopeMode::DeptAndChild => {
                    dept_modes.insert(role.data_scope);
                }
                DataScopeMode::SelfOnly => has_self = true,
            }
        }

        let mut depts: HashSet<Uuid> = HashSet::new();

        if !custom_role_ids.is_empty() {
            let ids = self
                .roles
                .find_role_department_ids(&custom_role_ids)
                .await?;
            depts.extend(ids);
        }

        if let Some(root) = principal.dept_id {
            for mode in dept_modes {
                let reachable = self
                    .hierarchy
                    .resolve(principal.tenant_id, root, mode)
                    .await?;
                depts.extend(reachable);
            }
        }

        if !depts.is_empty() {
            return Ok(DataScope::Departments(depts));
        }

        if has_self {
            return Ok(DataScope::OwnerOnly(principal.id));
        }

        // Zero roles or no recognized scope: preserved source behavior is
        // "no restriction", not deny-all. Kept visible in the logs.
        warn!(
            principal_id = %principal.id,
            "Principal resolved to an unrestricted data scope without an ALL role"
        );
        Ok(DataScope::Unrestricted)
    }
}
