//! Session store configuration.

use serde::{Deserialize, Serialize};

/// Session store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session record TTL in minutes. Each `put` starts a fresh window;
    /// `merge` preserves the remaining one.
    #[serde(default = "default_ttl")]
    pub ttl_minutes: u64,
    /// TTL for session deny-list entries in hours. Must cover the maximum
    /// token lifetime so a revoked session stays revoked until every token
    /// bound to it has expired.
    #[serde(default = "default_deny_list_ttl")]
    pub deny_list_ttl_hours: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: default_ttl(),
            deny_list_ttl_hours: default_deny_list_ttl(),
        }
    }
}

fn default_ttl() -> u64 {
    30
}

fn default_deny_list_ttl() -> u64 {
    24
}
