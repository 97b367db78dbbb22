//! Department entity.

mod model;

pub use model::Department;
