use std::thread;
use std::time::Duration;

use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::Text;

use sail_express::db::establish_connection_pool;
use sail_express::domain::locale::Locale;
use sail_express::domain::product::NewProduct;
use sail_express::domain::types::ProductId;
use sail_express::dto::products::DisplayProduct;
use sail_express::forms::products::ProductDraft;
use sail_express::repository::{DieselRepository, ProductReader, ProductWriter};
use tempfile::NamedTempFile;

mod common;

fn draft(name_en: &str, price: &str, category: &str) -> NewProduct {
    ProductDraft {
        name_en: Some(name_en.to_string()),
        price: Some(price.to_string()),
        category: Some(category.to_string()),
        ..Default::default()
    }
    .try_into()
    .expect("valid draft")
}

#[test]
fn create_fetch_update_filter_delete_roundtrip() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let created = repo
        .create_product(&draft("Fresh Salmon", "¥180/kg", "fresh"))
        .expect("should create product");
    assert!(created.id.get() >= 1);
    assert_eq!(created.category.as_str(), "fresh");
    assert_eq!(created.updated_at, created.created_at);
    assert_eq!(created.name, "Fresh Salmon");

    let fetched = repo
        .get_product_by_id(created.id)
        .expect("should fetch product")
        .expect("product should exist");
    assert_eq!(fetched, created);

    // Let the clock advance so the refreshed timestamp is strictly greater.
    thread::sleep(Duration::from_millis(10));

    let updated = repo
        .update_product(created.id, &draft("Fresh Salmon (Large)", "¥200/kg", "fresh"))
        .expect("should update product")
        .expect("product should exist");
    assert_eq!(updated.name_en.as_deref(), Some("Fresh Salmon (Large)"));
    assert_eq!(updated.name_zh, None);
    assert_eq!(updated.price.as_str(), "¥200/kg");
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.created_at);

    let fresh = repo
        .list_products_by_category("fresh")
        .expect("should list by category");
    assert!(fresh.iter().any(|p| p.id == created.id));

    let frozen = repo
        .list_products_by_category("frozen")
        .expect("should list by category");
    assert!(frozen.is_empty());

    let deleted = repo
        .delete_product(created.id)
        .expect("should delete product")
        .expect("product should exist");
    assert_eq!(deleted.id, created.id);

    let absent = repo
        .get_product_by_id(created.id)
        .expect("should fetch product");
    assert_eq!(absent, None);
}

#[test]
fn update_fully_replaces_multilingual_state() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let full_draft: NewProduct = ProductDraft {
        name_zh: Some("三文鱼".to_string()),
        name_en: Some("Salmon".to_string()),
        description_zh: Some("挪威进口".to_string()),
        description_en: Some("Norwegian import".to_string()),
        price: Some("¥180/kg".to_string()),
        category: Some("fresh".to_string()),
    }
    .try_into()
    .expect("valid draft");

    let created = repo
        .create_product(&full_draft)
        .expect("should create product");
    assert_eq!(created.name, "三文鱼");
    assert_eq!(created.description.as_deref(), Some("挪威进口"));

    let updated = repo
        .update_product(created.id, &draft("Salmon", "¥190/kg", "frozen"))
        .expect("should update product")
        .expect("product should exist");

    // Omitted fields are blanked, not merged.
    assert_eq!(updated.name_zh, None);
    assert_eq!(updated.description_zh, None);
    assert_eq!(updated.description_en, None);
    assert_eq!(updated.description, None);
    assert_eq!(updated.name, "Salmon");
    assert_eq!(updated.category.as_str(), "frozen");
}

#[test]
fn listing_orders_most_recent_first() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let first = repo
        .create_product(&draft("Salmon", "¥180/kg", "fresh"))
        .expect("should create product");
    let second = repo
        .create_product(&draft("Tuna", "¥220/kg", "fresh"))
        .expect("should create product");

    let products = repo.list_products().expect("should list products");
    let ids: Vec<ProductId> = products.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

#[test]
fn mutations_of_missing_ids_return_none_not_errors() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let missing = ProductId::new(4242).expect("valid id");
    assert!(repo.get_product_by_id(missing).expect("no fault").is_none());
    assert!(
        repo.update_product(missing, &draft("Salmon", "¥180/kg", "fresh"))
            .expect("no fault")
            .is_none()
    );
    assert!(repo.delete_product(missing).expect("no fault").is_none());
    assert!(repo.get_product_by_id(missing).expect("no fault").is_none());
}

#[derive(QueryableByName)]
struct TableColumn {
    #[diesel(sql_type = Text)]
    name: String,
}

fn column_names(pool: &sail_express::db::DbPool) -> Vec<String> {
    let mut conn = pool.get().expect("should acquire DB connection");
    sql_query("PRAGMA table_info(products)")
        .load::<TableColumn>(&mut conn)
        .expect("should introspect table")
        .into_iter()
        .map(|c| c.name)
        .collect()
}

#[test]
fn ensure_schema_is_idempotent() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let after_first = column_names(&test_db.pool());
    repo.ensure_schema().expect("second run should succeed");
    repo.ensure_schema().expect("third run should succeed");
    let after_third = column_names(&test_db.pool());

    assert_eq!(after_first, after_third);
    for column in ["name_zh", "name_en", "description_zh", "description_en"] {
        assert_eq!(after_third.iter().filter(|n| *n == column).count(), 1);
    }
}

#[test]
fn ensure_schema_upgrades_legacy_tables_without_data_loss() {
    let tempfile = NamedTempFile::new().expect("Failed to create temp file");
    let pool = establish_connection_pool(tempfile.path().to_str().unwrap())
        .expect("Failed to establish SQLite connection.");

    // A database created before multilingual support.
    {
        let mut conn = pool.get().expect("should acquire DB connection");
        sql_query(
            "CREATE TABLE products (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                description TEXT,
                price TEXT NOT NULL,
                category TEXT NOT NULL,
                image TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
        )
        .execute(&mut conn)
        .expect("should create legacy table");
        sql_query(
            "INSERT INTO products (name, description, price, category)
             VALUES ('新鲜三文鱼', '挪威进口新鲜三文鱼', '¥180/kg', 'fresh')",
        )
        .execute(&mut conn)
        .expect("should insert legacy row");
    }

    let repo = DieselRepository::new(pool);
    repo.ensure_schema().expect("schema upgrade should succeed");

    let product = repo
        .get_product_by_id(ProductId::new(1).expect("valid id"))
        .expect("should fetch product")
        .expect("legacy row should survive");
    assert_eq!(product.name, "新鲜三文鱼");
    assert_eq!(product.name_zh, None);
    assert_eq!(product.name_en, None);

    // Legacy fields still drive display resolution for old records.
    let display = DisplayProduct::localized(product.clone(), Locale::Zh);
    assert_eq!(display.name, "新鲜三文鱼");
    let display = DisplayProduct::localized(product, Locale::En);
    assert_eq!(display.name, "新鲜三文鱼");
}

#[test]
fn demo_seeding_runs_once() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let seeded = repo.seed_demo_products().expect("seeding should succeed");
    assert_eq!(seeded, 6);
    assert_eq!(repo.seed_demo_products().expect("no fault"), 0);

    let dry = repo
        .list_products_by_category("dry")
        .expect("should list by category");
    assert_eq!(dry.len(), 2);
}
