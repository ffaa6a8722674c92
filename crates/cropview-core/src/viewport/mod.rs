pub mod kernel;
pub mod store;

pub use store::{Refit, ViewTransformStore};
