//! # warden-auth
//!
//! The Warden authorization and session-lifecycle engine. Surrounding CRUD
//! modules of the host application call into this crate through the
//! [`manager::AuthManager`] operations and the data-scope / permission
//! helpers; the identity, role, and department stores are collaborator
//! traits the host implements.
//!
//! ## Modules
//!
//! - `token` - signed-token creation and validation (HS256)
//! - `revocation` - per-principal token versions and the session deny-list
//! - `guard` - brute-force lockout state machine
//! - `scope` - department hierarchy and data-scope resolution
//! - `permission` - permission aggregation with explicit cache eviction
//! - `session` - TTL-backed session store with merge semantics
//! - `password` - Argon2id credential verification
//! - `store` - collaborator store traits
//! - `manager` - the authentication orchestrator

pub mod guard;
pub mod manager;
pub mod outcome;
pub mod password;
pub mod permission;
pub mod revocation;
pub mod scope;
pub mod session;
pub mod store;
pub mod token;

pub use guard::LoginGuard;
pub use manager::{AuthManager, LoginResult};
pub use outcome::DenyReason;
pub use password::PasswordHasher;
pub use permission::PermissionAggregator;
pub use revocation::RevocationService;
pub use scope::{DataScope, DataScopeResolver, DeptHierarchyResolver};
pub use session::SessionStore;
pub use store::{DepartmentStore, IdentityStore, RoleStore};
pub use token::{Claims, SignedToken, TokenIssuer, TokenVerifier};
