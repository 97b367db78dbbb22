//! # warden-cache
//!
//! Cache providers for the Warden engine. The session store, lockout
//! counters, token versions, deny-list entries, and the permission cache
//! all live behind the [`warden_core::traits::CacheProvider`] trait; this
//! crate supplies the in-memory (`moka` + `dashmap`) and Redis backends and
//! the [`provider::CacheManager`] that selects between them.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::CacheManager;
