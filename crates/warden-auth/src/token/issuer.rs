//! Signed-token creation with configurable signing and TTL.

use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use warden_core::config::auth::AuthConfig;
use warden_core::error::AppError;

use super::claims::Claims;

/// A freshly minted token with its expiry.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SignedToken {
    /// The compact encoded token.
    pub token: String,
    /// Expiration timestamp.
    pub expires_at: chrono::DateTime<Utc>,
}

/// Creates signed tokens bound to a session id and token version.
///
/// Issuance is a pure signature computation: the session record is written
/// by the orchestrator in a separate, explicit step.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Token TTL in minutes.
    ttl_minutes: i64,
}

impl TokenIssuer {
    /// Creates a new issuer from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.token_secret.as_bytes()),
            ttl_minutes: config.token_ttl_minutes as i64,
        }
    }

    /// Signs a token over the (principal, tenant, session, version) tuple.
    pub fn issue(
        &self,
        principal_id: Uuid,
        tenant_id: Uuid,
        session_id: Uuid,
        token_version: i64,
    ) -> Result<SignedToken, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::minutes(self.ttl_minutes);

        let claims = Claims {
            sub: principal_id,
            tid: tenant_id,
            sid: session_id,
            ver: token_version,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode token: {e}")))?;

        Ok(SignedToken { token, expires_at })
    }
}
