//! Token validation: signature and expiry only.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::debug;

use warden_core::config::auth::AuthConfig;
use warden_core::error::AppError;

use crate::outcome::DenyReason;

use super::claims::Claims;

/// Validates signed tokens.
///
/// Deliberately unaware of the session store and the revocation service:
/// a token that verifies here is only a candidate, not an authenticated
/// caller.
#[derive(Clone)]
pub struct TokenVerifier {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenVerifier {
    /// Creates a new verifier from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5; // 5 seconds leeway for clock skew

        Self {
            decoding_key: DecodingKey::from_secret(config.token_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates a token string, checking signature and expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                let reason = match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => DenyReason::TokenExpired,
                    _ => DenyReason::TokenMalformed,
                };
                debug!(reason = %reason, "Token rejected");
                reason.into_error()
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenIssuer;
    use uuid::Uuid;
    use warden_core::config::auth::AuthConfig;

    fn config() -> AuthConfig {
        AuthConfig {
            token_secret: "unit-test-secret".into(),
            ..Default::default()
        }
    }

    #[test]
    fn issue_then_verify_roundtrips_claims() {
        let cfg = config();
        let issuer = TokenIssuer::new(&cfg);
        let verifier = TokenVerifier::new(&cfg);

        let principal = Uuid::new_v4();
        let tenant = Uuid::new_v4();
        let session = Uuid::new_v4();

        let signed = issuer.issue(principal, tenant, session, 3).unwrap();
        let claims = verifier.verify(&signed.token).unwrap();

        assert_eq!(claims.principal_id(), principal);
        assert_eq!(claims.tid, tenant);
        assert_eq!(claims.session_id(), session);
        assert_eq!(claims.ver, 3);
        assert!(!claims.is_expired());
    }

    #[test]
    fn garbage_is_malformed() {
        let verifier = TokenVerifier::new(&config());
        let err = verifier.verify("not-a-token").unwrap_err();
        assert_eq!(err.message, "Invalid token");
    }

    #[test]
    fn wrong_secret_fails_closed() {
        let issuer = TokenIssuer::new(&config());
        let other = AuthConfig {
            token_secret: "a-different-secret".into(),
            ..Default::default()
        };
        let verifier = TokenVerifier::new(&other);

        let signed = issuer
            .issue(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), 0)
            .unwrap();
        assert!(verifier.verify(&signed.token).is_err());
    }
}
