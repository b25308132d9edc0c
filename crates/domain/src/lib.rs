//! Inventory domain: products, categories, and the audit-logged
//! mutation pipeline that every write runs through.

pub mod category;
pub mod error;
pub mod pipeline;
pub mod product;

pub use category::{Category, CategoryPatch, CategoryService, NewCategory};
pub use error::{DomainError, Result};
pub use pipeline::MutationPipeline;
pub use product::{
    NewProduct, Product, ProductFilter, ProductPatch, ProductService, StockService, StockStatus,
};
