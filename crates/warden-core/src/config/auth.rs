//! Authentication and lockout configuration.

use serde::{Deserialize, Serialize};

/// Authentication, token, and brute-force lockout configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for token signing (HMAC-SHA256).
    #[serde(default = "default_token_secret")]
    pub token_secret: String,
    /// Signed token TTL in minutes.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_minutes: u64,
    /// Maximum consecutive failed login attempts before lockout.
    #[serde(default = "default_max_failed")]
    pub max_failed_attempts: i64,
    /// Window in minutes during which consecutive failures accumulate.
    #[serde(default = "default_failure_window")]
    pub failure_window_minutes: u64,
    /// Identity lockout duration in minutes once the threshold is hit.
    #[serde(default = "default_lockout")]
    pub lockout_duration_minutes: u64,
    /// Time budget for each store read on the verify path, in milliseconds.
    /// A timed-out read fails closed as "not authenticated".
    #[serde(default = "default_verify_timeout")]
    pub verify_timeout_millis: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: default_token_secret(),
            token_ttl_minutes: default_token_ttl(),
            max_failed_attempts: default_max_failed(),
            failure_window_minutes: default_failure_window(),
            lockout_duration_minutes: default_lockout(),
            verify_timeout_millis: default_verify_timeout(),
        }
    }
}

fn default_token_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_token_ttl() -> u64 {
    30
}

fn default_max_failed() -> i64 {
    5
}

fn default_failure_window() -> u64 {
    10
}

fn default_lockout() -> u64 {
    30
}

fn default_verify_timeout() -> u64 {
    3000
}
