//! Department entity model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A node in a tenant's department forest, owned by the external store.
///
/// The ancestry path is ordered root-to-parent and is immutable after
/// creation except on an explicit move, which the owning store performs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    /// Unique department identifier.
    pub id: Uuid,
    /// Tenant this department belongs to.
    pub tenant_id: Uuid,
    /// Parent department, `None` for a root.
    pub parent_id: Option<Uuid>,
    /// Ordered list of ancestor ids, root first, parent last.
    pub ancestors: Vec<Uuid>,
    /// Whether the department is enabled.
    pub enabled: bool,
    /// Soft-delete flag.
    pub deleted: bool,
}

impl Department {
    /// Whether `dept_id` appears anywhere on this node's ancestry path.
    ///
    /// A node with a path that does not end at its own parent is treated as
    /// corrupted and unreachable, never as an error.
    pub fn descends_from(&self, dept_id: Uuid) -> bool {
        match (self.ancestors.last(), self.parent_id) {
            (Some(last), Some(parent)) if *last == parent => {
                self.ancestors.contains(&dept_id)
            }
            _ => false,
        }
    }
}
