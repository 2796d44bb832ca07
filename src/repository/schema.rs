//! Table creation and additive, idempotent schema evolution.

use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::Text;

use crate::domain::category::Category;
use crate::domain::product::NewProduct;
use crate::domain::types::PriceTag;
use crate::repository::{DieselRepository, ProductWriter, RepositoryResult};

/// Legacy base shape of the `products` table. Records created before
/// multilingual support only carried these columns.
const CREATE_PRODUCTS_TABLE: &str = "\
CREATE TABLE IF NOT EXISTS products (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    description TEXT,
    price TEXT NOT NULL,
    category TEXT NOT NULL,
    image TEXT,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
)";

/// Columns added after the initial deployment, in addition order.
const MULTILINGUAL_COLUMNS: [&str; 4] =
    ["name_zh", "name_en", "description_zh", "description_en"];

#[derive(QueryableByName)]
struct TableColumn {
    #[diesel(sql_type = Text)]
    name: String,
}

impl DieselRepository {
    /// Create the `products` table if absent and add any missing
    /// multilingual columns, without touching existing data.
    ///
    /// Column presence is determined by introspection, so re-running this on
    /// every process start is safe: applying it N times yields the same
    /// schema as applying it once. Only genuine storage faults propagate.
    pub fn ensure_schema(&self) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        sql_query(CREATE_PRODUCTS_TABLE).execute(&mut conn)?;

        let existing: Vec<String> = sql_query("PRAGMA table_info(products)")
            .load::<TableColumn>(&mut conn)?
            .into_iter()
            .map(|column| column.name)
            .collect();

        for column in MULTILINGUAL_COLUMNS {
            if !existing.iter().any(|name| name == column) {
                sql_query(format!("ALTER TABLE products ADD COLUMN {column} TEXT"))
                    .execute(&mut conn)?;
                log::info!("Added column {column} to products table");
            }
        }

        Ok(())
    }

    /// Insert the demo catalog when the table is empty.
    ///
    /// Returns the number of inserted products (zero when data already
    /// exists).
    pub fn seed_demo_products(&self) -> RepositoryResult<usize> {
        use crate::schema::products;

        let count: i64 = {
            let mut conn = self.conn()?;
            products::table.count().get_result(&mut conn)?
        };
        if count > 0 {
            return Ok(0);
        }

        let demo = demo_products()?;
        for new_product in &demo {
            self.create_product(new_product)?;
        }

        Ok(demo.len())
    }
}

fn demo_products() -> RepositoryResult<Vec<NewProduct>> {
    let entries = [
        (
            "新鲜三文鱼",
            "Fresh Salmon",
            "挪威进口新鲜三文鱼，肉质鲜美，适合制作各类寿司",
            "Norwegian imported fresh salmon, delicious meat, suitable for making various sushi",
            "¥180/kg",
            Category::Fresh,
        ),
        (
            "金枪鱼",
            "Tuna",
            "深海金枪鱼，口感细腻，营养丰富",
            "Deep sea tuna, delicate taste, rich in nutrition",
            "¥220/kg",
            Category::Fresh,
        ),
        (
            "寿司米",
            "Sushi Rice",
            "日本进口寿司专用米，粘性适中，口感绝佳",
            "Japanese imported sushi rice, moderate stickiness, excellent taste",
            "¥25/kg",
            Category::Dry,
        ),
        (
            "海苔",
            "Nori Seaweed",
            "优质海苔，色泽深绿，口感脆嫩",
            "High-quality nori seaweed, deep green color, crisp and tender taste",
            "¥15/包",
            Category::Dry,
        ),
        (
            "寿司刀",
            "Sushi Knife",
            "专业寿司刀，锋利耐用，切割精准",
            "Professional sushi knife, sharp and durable, precise cutting",
            "¥280/把",
            Category::Supply,
        ),
        (
            "寿司卷帘",
            "Sushi Rolling Mat",
            "竹制寿司卷帘，传统工艺，使用方便",
            "Bamboo sushi rolling mat, traditional craftsmanship, easy to use",
            "¥45/个",
            Category::Supply,
        ),
    ];

    entries
        .into_iter()
        .map(|(name_zh, name_en, desc_zh, desc_en, price, category)| {
            Ok(NewProduct {
                name_zh: Some(name_zh.to_string()),
                name_en: Some(name_en.to_string()),
                description_zh: Some(desc_zh.to_string()),
                description_en: Some(desc_en.to_string()),
                price: PriceTag::new(price)?,
                category,
                image: None,
            })
        })
        .collect()
}
