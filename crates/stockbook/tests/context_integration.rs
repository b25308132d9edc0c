//! Integration tests for the file-backed context.
//!
//! These tests verify durability across handles, the on-disk layout,
//! and export assembly over real collection files.

use common::Actor;
use domain::{NewCategory, NewProduct, ProductFilter};
use stockbook::{
    AUDIT_LOGS_FILE, CATEGORIES_FILE, Config, FileContext, PRODUCTS_FILE,
};
use tempfile::TempDir;

fn config_for(dir: &TempDir) -> Config {
    Config {
        data_dir: dir.path().to_path_buf(),
        log_level: "info".to_string(),
    }
}

fn new_product(name: &str, category_id: common::EntityId) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        description: format!("{name} for durability tests"),
        category_id,
        subcategory_id: None,
        minimum_stock_alert: 5,
        initial_stock: Some(10),
    }
}

mod durability {
    use super::*;

    #[tokio::test]
    async fn operations_survive_reopening_the_store() {
        let dir = TempDir::new().unwrap();
        let config = config_for(&dir);

        let (category_id, product_id) = {
            let ctx = FileContext::open(&config);
            let category = ctx
                .categories
                .create(
                    NewCategory {
                        name: "Electrical".to_string(),
                        parent_id: None,
                    },
                    Actor::new("alice"),
                )
                .await
                .unwrap();
            let product = ctx
                .products
                .create(new_product("Wire spool", category.id), Actor::new("alice"))
                .await
                .unwrap();
            ctx.stock
                .restock(product.id, 15, Actor::new("bob"))
                .await
                .unwrap();
            ctx.stock
                .remove_stock(product.id, 8, Actor::new("carol"))
                .await
                .unwrap();
            (category.id, product.id)
        };

        // A second handle over the same directory sees everything.
        let reopened = FileContext::open(&config);

        let product = reopened.products.get(product_id).await.unwrap();
        assert_eq!(product.current_stock, 17);
        assert_eq!(product.total_removed, 8);
        assert_eq!(product.last_modified_by, Actor::new("carol"));

        let category = reopened.categories.get(category_id).await.unwrap();
        assert_eq!(category.name, "Electrical");

        assert_eq!(reopened.audit.count().await.unwrap(), 4);
        let trail = reopened
            .audit
            .find_by_entity(audit_log::EntityKind::Product, product_id)
            .await
            .unwrap();
        assert_eq!(trail.len(), 3);
        assert_eq!(trail[0].user, Actor::new("carol"));
    }

    #[tokio::test]
    async fn collection_files_carry_their_fixed_names() {
        let dir = TempDir::new().unwrap();
        let config = config_for(&dir);
        let ctx = FileContext::open(&config);

        let category = ctx
            .categories
            .create(
                NewCategory {
                    name: "Plumbing".to_string(),
                    parent_id: None,
                },
                Actor::system(),
            )
            .await
            .unwrap();
        ctx.products
            .create(new_product("Copper pipe", category.id), Actor::system())
            .await
            .unwrap();

        for file in [PRODUCTS_FILE, CATEGORIES_FILE, AUDIT_LOGS_FILE] {
            assert!(config.data_path(file).is_file(), "missing {file}");
        }

        // Each file is a JSON array of camelCase records.
        let raw = std::fs::read_to_string(config.data_path(PRODUCTS_FILE)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let records = value.as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].get("currentStock").is_some());
    }

    #[tokio::test]
    async fn missing_data_dir_reads_as_empty_store() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            data_dir: dir.path().join("never-written"),
            log_level: "info".to_string(),
        };
        let ctx = FileContext::open(&config);

        assert!(
            ctx.products
                .list(ProductFilter::default())
                .await
                .unwrap()
                .is_empty()
        );
        assert!(ctx.categories.list().await.unwrap().is_empty());
        assert_eq!(ctx.audit.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn audit_stream_replays_history_oldest_first() {
        use futures_util::StreamExt;

        let dir = TempDir::new().unwrap();
        let config = config_for(&dir);
        let ctx = FileContext::open(&config);

        let product = ctx
            .products
            .create(new_product("Teflon tape", common::EntityId::new()), Actor::system())
            .await
            .unwrap();
        ctx.stock
            .restock(product.id, 5, Actor::system())
            .await
            .unwrap();

        let stream = ctx.audit.stream_all().await.unwrap();
        let actions: Vec<_> = stream
            .map(|entry| entry.unwrap().action())
            .collect()
            .await;
        assert_eq!(
            actions,
            vec![audit_log::AuditAction::Create, audit_log::AuditAction::Restock]
        );
    }
}

mod export {
    use super::*;

    #[tokio::test]
    async fn bundle_round_trips_through_json() {
        let dir = TempDir::new().unwrap();
        let config = config_for(&dir);
        let ctx = FileContext::open(&config);

        let category = ctx
            .categories
            .create(
                NewCategory {
                    name: "Hardware".to_string(),
                    parent_id: None,
                },
                Actor::system(),
            )
            .await
            .unwrap();
        ctx.products
            .create(new_product("Hinges", category.id), Actor::system())
            .await
            .unwrap();

        let bundle = ctx.export().await.unwrap();
        let json = serde_json::to_string_pretty(&bundle).unwrap();
        let decoded: stockbook::ExportBundle = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded.total_products, 1);
        assert_eq!(decoded.products[0].name, "Hinges");
        assert_eq!(decoded.total_categories, 1);
        assert_eq!(decoded.total_audit_logs, 2);
        assert_eq!(decoded.audit_logs.len(), 2);
    }
}

mod telemetry {
    use super::*;

    #[test]
    fn try_init_reports_an_already_set_subscriber() {
        let config = Config::default();
        assert!(stockbook::telemetry::try_init(&config).is_ok());
        assert!(stockbook::telemetry::try_init(&config).is_err());
    }
}
