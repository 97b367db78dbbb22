//! Shared trait seams.

pub mod cache;

pub use cache::CacheProvider;
