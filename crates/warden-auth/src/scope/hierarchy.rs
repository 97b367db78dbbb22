//! Department hierarchy walks.

use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use warden_core::result::AppResult;
use warden_entity::DataScopeMode;

use crate::store::DepartmentStore;

/// Resolves the set of department ids reachable from a root under a scope
/// mode. Walks the stored ancestry paths; there is no recursion.
#[derive(Clone)]
pub struct DeptHierarchyResolver {
    /// Department store collaborator.
    departments: Arc<dyn DepartmentStore>,
}

impl std::fmt::Debug for DeptHierarchyResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeptHierarchyResolver").finish()
    }
}

impl DeptHierarchyResolver {
    /// Creates a new hierarchy resolver.
    pub fn new(departments: Arc<dyn DepartmentStore>) -> Self {
        Self { departments }
    }

    /// Resolve the departments reachable from `root` under `mode`.
    ///
    /// - `Dept` returns `{root}` without a store call.
    /// - `DeptAndChild` returns `{root}` plus every non-deleted tenant
    ///   department whose ancestry path contains `root`. An unknown root
    ///   yields the empty set; a department with a corrupted path is
    ///   excluded as unreachable. Neither is an error.
    /// - Other modes do not walk the hierarchy and yield the empty set.
    pub async fn resolve(
        &self,
        tenant_id: Uuid,
        root: Uuid,
        mode: DataScopeMode,
    ) -> AppResult<HashSet<Uuid>> {
        match mode {
            DataScopeMode::Dept => Ok(HashSet::from([root])),
            DataScopeMode::DeptAndChild => {
                let all = self.departments.find_all(tenant_id).await?;

                if !all.iter().any(|d| d.id == root && !d.deleted) {
                    return Ok(HashSet::new());
                }

                let mut reachable: HashSet<Uuid> = all
                    .iter()
                    .filter(|d| !d.deleted && d.descends_from(root))
                    .map(|d| d.id)
                    .collect();
                reachable.insert(root);
                Ok(reachable)
            }
            _ => Ok(HashSet::new()),
        }
    }
}
