//! Full-dataset export bundles.

use audit_log::AuditEntry;
use chrono::{DateTime, Utc};
use domain::{Category, Product, ProductFilter, Result};
use record_store::Collection;
use serde::{Deserialize, Serialize};

use crate::context::AppContext;

/// Snapshot of the whole store for export or backup.
///
/// Products honor the soft-delete filter, categories are complete, and
/// the audit view is the capped newest-first listing. The totals are
/// the lengths of the arrays they describe.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub audit_logs: Vec<AuditEntry>,
    pub exported_at: DateTime<Utc>,
    pub total_products: usize,
    pub total_categories: usize,
    pub total_audit_logs: usize,
}

impl<P, C, L> AppContext<P, C, L>
where
    P: Collection<Record = Product>,
    C: Collection<Record = Category>,
    L: Collection<Record = AuditEntry>,
{
    /// Assembles an export bundle from the live services.
    #[tracing::instrument(skip(self))]
    pub async fn export(&self) -> Result<ExportBundle> {
        let products = self.products.list(ProductFilter::default()).await?;
        let categories = self.categories.list().await?;
        let audit_logs = self.audit.find_all().await?;
        Ok(ExportBundle {
            total_products: products.len(),
            total_categories: categories.len(),
            total_audit_logs: audit_logs.len(),
            products,
            categories,
            audit_logs,
            exported_at: Utc::now(),
        })
    }
}
