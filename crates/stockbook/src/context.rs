//! Dependency wiring for the inventory services.

use audit_log::{AuditEntry, AuditLog, EntityKind};
use domain::{Category, CategoryService, MutationPipeline, Product, ProductService, StockService};
use record_store::{Collection, JsonFileCollection, MemoryCollection, RecordTable};

use crate::config::Config;

/// Collection file name for products.
pub const PRODUCTS_FILE: &str = "products.json";
/// Collection file name for categories.
pub const CATEGORIES_FILE: &str = "categories.json";
/// Collection file name for the audit trail.
pub const AUDIT_LOGS_FILE: &str = "audit-logs.json";

/// The wired set of services sharing one store.
///
/// All services append to one audit log, and the product and stock
/// services share one pipeline so their writes to a product serialize.
/// Clones share every backend; a context is built once per store and
/// handed out freely.
pub struct AppContext<P, C, L>
where
    P: Collection<Record = Product>,
    C: Collection<Record = Category>,
    L: Collection<Record = AuditEntry>,
{
    pub products: ProductService<P, L>,
    pub stock: StockService<P, L>,
    pub categories: CategoryService<C, L>,
    pub audit: AuditLog<L>,
}

impl<P, C, L> Clone for AppContext<P, C, L>
where
    P: Collection<Record = Product>,
    C: Collection<Record = Category>,
    L: Collection<Record = AuditEntry>,
{
    fn clone(&self) -> Self {
        Self {
            products: self.products.clone(),
            stock: self.stock.clone(),
            categories: self.categories.clone(),
            audit: self.audit.clone(),
        }
    }
}

impl<P, C, L> AppContext<P, C, L>
where
    P: Collection<Record = Product>,
    C: Collection<Record = Category>,
    L: Collection<Record = AuditEntry>,
{
    /// Wires the services over the given collection backends.
    pub fn new(products: P, categories: C, audit: L) -> Self {
        let audit = AuditLog::new(audit);
        let product_pipeline = MutationPipeline::new(
            RecordTable::new(products),
            audit.clone(),
            EntityKind::Product,
        );
        let category_pipeline = MutationPipeline::new(
            RecordTable::new(categories),
            audit.clone(),
            EntityKind::Category,
        );
        Self {
            products: ProductService::new(product_pipeline.clone()),
            stock: StockService::new(product_pipeline),
            categories: CategoryService::new(category_pipeline),
            audit,
        }
    }
}

/// Volatile context for tests and short-lived embedding.
pub type MemoryContext =
    AppContext<MemoryCollection<Product>, MemoryCollection<Category>, MemoryCollection<AuditEntry>>;

/// Durable context over one JSON collection file per entity kind.
pub type FileContext = AppContext<
    JsonFileCollection<Product>,
    JsonFileCollection<Category>,
    JsonFileCollection<AuditEntry>,
>;

impl MemoryContext {
    pub fn in_memory() -> Self {
        Self::new(
            MemoryCollection::new(),
            MemoryCollection::new(),
            MemoryCollection::new(),
        )
    }
}

impl FileContext {
    /// Opens a context over the configured data directory.
    ///
    /// Collection files are created lazily on first write; a missing
    /// directory reads as an empty store.
    pub fn open(config: &Config) -> Self {
        tracing::info!(data_dir = %config.data_dir.display(), "opening file-backed store");
        Self::new(
            JsonFileCollection::new(config.data_path(PRODUCTS_FILE)),
            JsonFileCollection::new(config.data_path(CATEGORIES_FILE)),
            JsonFileCollection::new(config.data_path(AUDIT_LOGS_FILE)),
        )
    }
}
