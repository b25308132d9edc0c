//! Product aggregate: catalog records, stock classification, and the
//! services that mutate them.

mod model;
mod service;
mod status;
mod stock;

pub use model::{NewProduct, Product, ProductFilter, ProductPatch};
pub use service::ProductService;
pub use status::StockStatus;
pub use stock::StockService;
