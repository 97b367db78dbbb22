//! Principal (authenticated identity) entity.

mod model;
mod status;

pub use model::Principal;
pub use status::PrincipalStatus;
