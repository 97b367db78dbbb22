//! Data-scope mode enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A role attribute determining which subset of tenant records a holder may
/// see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataScopeMode {
    /// No restriction.
    All,
    /// An explicit set of departments associated with the role.
    Custom,
    /// The holder's own department only.
    Dept,
    /// The holder's department and all of its descendants.
    DeptAndChild,
    /// Records owned by the holder only.
    SelfOnly,
}

impl DataScopeMode {
    /// Whether this mode resolves against the department hierarchy rooted at
    /// the holder's own department.
    pub fn is_dept_rooted(&self) -> bool {
        matches!(self, Self::Dept | Self::DeptAndChild)
    }
}

impl fmt::Display for DataScopeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::All => "all",
            Self::Custom => "custom",
            Self::Dept => "dept",
            Self::DeptAndChild => "dept_and_child",
            Self::SelfOnly => "self_only",
        };
        write!(f, "{s}")
    }
}
