//! Session record and merge patch.

mod model;

pub use model::{ClientInfo, SessionPatch, SessionRecord};
