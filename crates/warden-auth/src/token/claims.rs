//! Token claims structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims payload embedded in every signed token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (the principal id).
    pub sub: Uuid,
    /// Tenant of the principal at issuance.
    pub tid: Uuid,
    /// Session id this token must be redeemed against.
    pub sid: Uuid,
    /// Principal token version at issuance. A bump invalidates every token
    /// minted before it without enumerating them.
    pub ver: i64,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Token id.
    pub jti: Uuid,
}

impl Claims {
    /// Returns the principal id from the subject claim.
    pub fn principal_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the session id.
    pub fn session_id(&self) -> Uuid {
        self.sid
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }

    /// Checks whether this token has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}
