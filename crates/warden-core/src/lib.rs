//! # warden-core
//!
//! Core crate for the Warden authorization engine. Contains the unified
//! error system, configuration schemas, the logging bootstrap, and the
//! cache-provider trait.
//!
//! This crate has **no** internal dependencies on other Warden crates.

pub mod config;
pub mod error;
pub mod logging;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
