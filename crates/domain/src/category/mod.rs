//! Category aggregate: hierarchical grouping for products.

mod model;
mod service;

pub use model::{Category, CategoryPatch, NewCategory};
pub use service::CategoryService;
