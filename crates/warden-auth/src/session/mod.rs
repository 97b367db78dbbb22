//! Session persistence.

mod store;

pub use store::SessionStore;
