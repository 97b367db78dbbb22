//! Data-scope resolution.
//!
//! Converts a principal's role set into a query predicate restricting which
//! tenant records the principal may see. CRUD query builders apply the
//! resulting [`DataScope`]; this module never executes queries itself.

mod hierarchy;
mod resolver;

pub use hierarchy::DeptHierarchyResolver;
pub use resolver::DataScopeResolver;

use std::collections::HashSet;

use uuid::Uuid;

/// The predicate a principal's roles resolve to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataScope {
    /// No restriction.
    Unrestricted,
    /// Visible records are limited to these departments.
    Departments(HashSet<Uuid>),
    /// Visible records are limited to those owned by this principal.
    OwnerOnly(Uuid),
}

impl DataScope {
    /// Whether a record in `dept_id` is visible under this predicate.
    pub fn permits_department(&self, dept_id: Uuid) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::Departments(depts) => depts.contains(&dept_id),
            Self::OwnerOnly(_) => false,
        }
    }

    /// Whether a record owned by `owner_id` is visible under this predicate.
    pub fn permits_owner(&self, owner_id: Uuid) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::Departments(_) => false,
            Self::OwnerOnly(principal) => *principal == owner_id,
        }
    }

    /// Whether this predicate restricts anything at all.
    pub fn is_unrestricted(&self) -> bool {
        matches!(self, Self::Unrestricted)
    }
}
