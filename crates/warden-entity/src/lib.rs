//! # warden-entity
//!
//! Domain entity models for the Warden authorization engine. Every struct in
//! this crate represents a row owned by a collaborator store or a value
//! object held in the session cache. All entities derive `Debug`, `Clone`,
//! `Serialize`, and `Deserialize`.
//!
//! Soft deletion is an implicit precondition on every store read: a
//! collaborator store never returns a row whose delete flag is set; the
//! engine still carries `deleted` so it can fail closed on a stale read.

pub mod department;
pub mod principal;
pub mod role;
pub mod session;

pub use department::Department;
pub use principal::{Principal, PrincipalStatus};
pub use role::{DataScopeMode, Role, RoleStatus, SUPER_ADMIN_ROLE_ID, WILDCARD_PERMISSION};
pub use session::{ClientInfo, SessionPatch, SessionRecord};
