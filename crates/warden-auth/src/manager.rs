//! Authentication orchestrator: login, verify, refresh, logout flows.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use warden_core::config::{auth::AuthConfig, session::SessionConfig};
use warden_core::error::AppError;
use warden_core::result::AppResult;
use warden_entity::{ClientInfo, Principal, SessionPatch, SessionRecord};

use crate::guard::LoginGuard;
use crate::outcome::DenyReason;
use crate::password::PasswordHasher;
use crate::permission::PermissionAggregator;
use crate::revocation::RevocationService;
use crate::scope::{DataScope, DataScopeResolver};
use crate::session::SessionStore;
use crate::store::{IdentityStore, RoleStore};
use crate::token::{SignedToken, TokenIssuer, TokenVerifier};

/// Result of a successful login.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LoginResult {
    /// The signed token the client redeems on subsequent calls.
    pub token: SignedToken,
    /// The created session record.
    pub session: SessionRecord,
}

/// Composes the guard, issuer, revocation, session store, and resolvers
/// into the four session-lifecycle operations, plus the data-scope and
/// permission hooks CRUD callers use.
#[derive(Clone)]
pub struct AuthManager {
    /// Identity store collaborator.
    identities: Arc<dyn IdentityStore>,
    /// Role/resource store collaborator.
    roles: Arc<dyn RoleStore>,
    /// Token issuer.
    issuer: TokenIssuer,
    /// Token verifier.
    verifier: TokenVerifier,
    /// Session persistence.
    sessions: SessionStore,
    /// Revocation state.
    revocation: RevocationService,
    /// Brute-force lockout guard.
    guard: LoginGuard,
    /// Permission aggregation and cache.
    permissions: PermissionAggregator,
    /// Data-scope resolution for CRUD query builders.
    scopes: DataScopeResolver,
    /// Password hasher.
    hasher: PasswordHasher,
    /// Session record TTL.
    session_ttl: Duration,
    /// Time budget per store read on the verify path.
    verify_timeout: Duration,
}

impl std::fmt::Debug for AuthManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthManager")
            .field("session_ttl", &self.session_ttl)
            .field("verify_timeout", &self.verify_timeout)
            .finish()
    }
}

impl AuthManager {
    /// Creates a new orchestrator with all required dependencies.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        identities: Arc<dyn IdentityStore>,
        roles: Arc<dyn RoleStore>,
        issuer: TokenIssuer,
        verifier: TokenVerifier,
        sessions: SessionStore,
        revocation: RevocationService,
        guard: LoginGuard,
        permissions: PermissionAggregator,
        scopes: DataScopeResolver,
        auth_config: &AuthConfig,
        session_config: &SessionConfig,
    ) -> Self {
        Self {
            identities,
            roles,
            issuer,
            verifier,
            sessions,
            revocation,
            guard,
            permissions,
            scopes,
            hasher: PasswordHasher::new(),
            session_ttl: Duration::from_secs(session_config.ttl_minutes * 60),
            verify_timeout: Duration::from_millis(auth_config.verify_timeout_millis),
        }
    }

    /// Performs the complete login flow:
    ///
    /// 1. Lockout pre-check
    /// 2. Credential check (failure consumes a lockout attempt)
    /// 3. Counter reset, then status checks (these consume nothing)
    /// 4. Mint session id, gather roles and permissions
    /// 5. Issue token at the current token version
    /// 6. Write the session record
    ///
    /// Two concurrent logins for the same identity may both succeed, each
    /// with an independent session; sessions are not mutually exclusive.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        client: ClientInfo,
    ) -> AppResult<LoginResult> {
        self.guard.check(username).await?;

        let principal = match self.identities.find_by_username(username).await? {
            Some(p) => p,
            None => {
                self.guard.record_failure(username).await?;
                return Err(DenyReason::InvalidCredentials.into_error());
            }
        };

        if !self.hasher.verify_password(password, &principal.password_hash)? {
            let outcome = self.guard.record_failure(username).await?;
            info!(
                username,
                locked = outcome.locked,
                reason = %DenyReason::InvalidCredentials,
                "Login rejected"
            );
            return Err(DenyReason::InvalidCredentials.into_error());
        }

        self.guard.clear(username).await?;

        if principal.deleted {
            return Err(DenyReason::AccountDeleted.into_error());
        }
        if !principal.status.can_login() {
            return Err(DenyReason::AccountDisabled.into_error());
        }

        let session_id = Uuid::new_v4();

        let roles = self.roles.find_roles(&principal.role_ids).await?;
        let role_keys: Vec<String> = roles
            .iter()
            .filter(|r| r.is_effective())
            .map(|r| r.key.clone())
            .collect();

        let mut permission_list: Vec<String> = self
            .permissions
            .aggregate(principal.id, &principal.role_ids)
            .await?
            .into_iter()
            .collect();
        permission_list.sort();

        let version = self.revocation.current_version(principal.id).await?;
        let token = self
            .issuer
            .issue(principal.id, principal.tenant_id, session_id, version)?;

        let now = Utc::now();
        let record = SessionRecord {
            session_id,
            principal_id: principal.id,
            tenant_id: principal.tenant_id,
            issued_at: now,
            expires_at: now + chrono::Duration::seconds(self.session_ttl.as_secs() as i64),
            client,
            role_keys,
            permissions: permission_list,
            extra: serde_json::Map::new(),
        };
        self.sessions.put(&record, self.session_ttl).await?;

        info!(
            principal_id = %principal.id,
            session_id = %session_id,
            "Login successful"
        );

        Ok(LoginResult {
            token,
            session: record,
        })
    }

    /// Redeem a signed token against a live session.
    ///
    /// Layered checks: signature/expiry, deny-list, token version, session
    /// lookup, failing closed at each step. Deny-list hits, version
    /// mismatches, missing sessions, and store timeouts all surface as the
    /// same "not authenticated" error; only the log knows which it was.
    pub async fn verify(&self, token: &str) -> AppResult<SessionRecord> {
        let claims = self.verifier.verify(token)?;

        let revoked = self
            .timed(self.revocation.is_session_revoked(claims.sid))
            .await?;
        if revoked {
            return Err(self.deny(claims.sid, DenyReason::TokenRevoked));
        }

        let current = self
            .timed(self.revocation.current_version(claims.sub))
            .await?;
        if claims.ver != current {
            return Err(self.deny(claims.sid, DenyReason::TokenRevoked));
        }

        match self.timed(self.sessions.get(claims.sid)).await? {
            Some(record) => Ok(record),
            None => Err(self.deny(claims.sid, DenyReason::SessionNotFound)),
        }
    }

    /// Re-read the principal's roles and permissions and merge them into the
    /// session, preserving its remaining TTL.
    pub async fn refresh_permissions(&self, session_id: Uuid) -> AppResult<SessionRecord> {
        let record = self
            .sessions
            .get(session_id)
            .await?
            .ok_or_else(|| self.deny(session_id, DenyReason::SessionNotFound))?;

        let principal = self
            .identities
            .find_by_id(record.principal_id)
            .await?
            .ok_or_else(|| DenyReason::AccountDeleted.into_error())?;

        if principal.deleted {
            return Err(DenyReason::AccountDeleted.into_error());
        }
        if !principal.status.can_login() {
            return Err(DenyReason::AccountDisabled.into_error());
        }

        self.permissions.evict(principal.id).await?;
        let mut permission_list: Vec<String> = self
            .permissions
            .aggregate(principal.id, &principal.role_ids)
            .await?
            .into_iter()
            .collect();
        permission_list.sort();

        let roles = self.roles.find_roles(&principal.role_ids).await?;
        let role_keys: Vec<String> = roles
            .iter()
            .filter(|r| r.is_effective())
            .map(|r| r.key.clone())
            .collect();

        let merged = self
            .sessions
            .merge(
                session_id,
                SessionPatch {
                    role_keys: Some(role_keys),
                    permissions: Some(permission_list),
                    ..Default::default()
                },
            )
            .await?;

        info!(
            principal_id = %principal.id,
            session_id = %session_id,
            "Permissions refreshed"
        );
        Ok(merged)
    }

    /// Destroy a session. An absent record already means "not usable", so
    /// no deny-list entry is written here; see [`Self::revoke_session`] for
    /// forced termination.
    pub async fn logout(&self, session_id: Uuid) -> AppResult<()> {
        self.sessions.delete(session_id).await?;
        info!(session_id = %session_id, "Logout completed");
        Ok(())
    }

    /// Admin-forced termination of one session: deny-list it and drop the
    /// record, leaving the principal's other sessions untouched.
    pub async fn revoke_session(&self, session_id: Uuid) -> AppResult<()> {
        self.revocation.revoke_session(session_id).await?;
        self.sessions.delete(session_id).await
    }

    /// Invalidate every outstanding token of a principal (e.g. after a
    /// password change) by bumping the token version.
    pub async fn bump_token_version(&self, principal_id: Uuid) -> AppResult<()> {
        self.revocation.bump_version(principal_id).await
    }

    /// Resolve the data-scope predicate for CRUD query builders.
    pub async fn resolve_data_scope(&self, principal: &Principal) -> AppResult<DataScope> {
        self.scopes.resolve(principal).await
    }

    /// Aggregate permissions for a role set. See [`PermissionAggregator`].
    pub async fn aggregate_permissions(
        &self,
        principal_id: Uuid,
        role_ids: &[Uuid],
    ) -> AppResult<std::collections::HashSet<String>> {
        self.permissions.aggregate(principal_id, role_ids).await
    }

    /// Evict the cached permission set of a principal. Idempotent.
    pub async fn evict_permission_cache(&self, principal_id: Uuid) -> AppResult<()> {
        self.permissions.evict(principal_id).await
    }

    /// Evict every cached permission set, for role or resource mutations
    /// that affect an unbounded set of principals. Returns the number of
    /// entries removed.
    pub async fn evict_all_permission_caches(&self) -> AppResult<u64> {
        self.permissions.evict_all().await
    }

    /// Run a verify-path store read under the configured time budget.
    /// A timeout fails closed as "not authenticated".
    async fn timed<T>(
        &self,
        fut: impl std::future::Future<Output = AppResult<T>>,
    ) -> AppResult<T> {
        match tokio::time::timeout(self.verify_timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                warn!(reason = %DenyReason::StoreTimeout, "Verify-path store read timed out");
                Err(DenyReason::StoreTimeout.into_error())
            }
        }
    }

    /// Log the internal deny reason and return the caller-facing error.
    fn deny(&self, session_id: Uuid, reason: DenyReason) -> AppError {
        info!(session_id = %session_id, reason = %reason, "Authentication denied");
        reason.into_error()
    }
}
