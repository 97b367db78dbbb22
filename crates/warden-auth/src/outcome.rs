//! Authentication outcome taxonomy.
//!
//! Every way an attempt can be denied is a normal control-flow branch, not a
//! fault. Externally most of them collapse into a single "not authenticated"
//! message; the precise reason is only emitted to the tracing layer, so a
//! caller cannot distinguish a revoked token from a missing session.

use std::fmt;

use warden_core::error::AppError;

/// Internal reason code for a denied authentication attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// Wrong identity or secret. Consumes a lockout attempt.
    InvalidCredentials,
    /// Identity is locked out, with the remaining lock time rounded up to
    /// whole minutes.
    AccountLocked { minutes: i64 },
    /// Principal is administratively disabled.
    AccountDisabled,
    /// Principal row is soft-deleted.
    AccountDeleted,
    /// Token failed signature or structural validation.
    TokenMalformed,
    /// Token passed structural validation but has expired.
    TokenExpired,
    /// Session deny-listed or token version out of date.
    TokenRevoked,
    /// Valid signature but no live session record.
    SessionNotFound,
    /// A verify-path store read exceeded its time budget; fail closed.
    StoreTimeout,
}

impl DenyReason {
    /// Stable label for structured logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "invalid_credentials",
            Self::AccountLocked { .. } => "account_locked",
            Self::AccountDisabled => "account_disabled",
            Self::AccountDeleted => "account_deleted",
            Self::TokenMalformed => "token_malformed",
            Self::TokenExpired => "token_expired",
            Self::TokenRevoked => "token_revoked",
            Self::SessionNotFound => "session_not_found",
            Self::StoreTimeout => "store_timeout",
        }
    }

    /// The error surfaced to callers. Revocation, version mismatch, missing
    /// sessions, and verify-path timeouts are deliberately identical.
    pub fn into_error(self) -> AppError {
        match self {
            Self::InvalidCredentials => {
                AppError::unauthenticated("Invalid username or password")
            }
            Self::AccountLocked { minutes } => AppError::forbidden(format!(
                "Account is locked. Try again in {minutes} minute(s)."
            )),
            Self::AccountDisabled => {
                AppError::forbidden("Account is disabled. Contact an administrator.")
            }
            Self::AccountDeleted => {
                AppError::forbidden("Account is no longer available")
            }
            Self::TokenMalformed => AppError::unauthenticated("Invalid token"),
            Self::TokenExpired => AppError::unauthenticated("Token has expired"),
            Self::TokenRevoked | Self::SessionNotFound | Self::StoreTimeout => {
                AppError::unauthenticated("Not authenticated")
            }
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
