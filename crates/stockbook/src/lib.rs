//! Facade for embedding the inventory system.
//!
//! Wires the product, stock, and category services over a chosen
//! storage backend with one shared audit log, loads configuration from
//! the environment, and owns tracing subscriber setup for embedders
//! that want it.

pub mod config;
pub mod context;
pub mod export;
pub mod telemetry;

pub use config::Config;
pub use context::{
    AUDIT_LOGS_FILE, AppContext, CATEGORIES_FILE, FileContext, MemoryContext, PRODUCTS_FILE,
};
pub use export::ExportBundle;
