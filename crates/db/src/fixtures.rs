use thiserror::Error;

use stocky_core::{DomainError, InventoryItem};

use crate::DbPool;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    InvalidRow(#[from] DomainError),
}

#[derive(Debug)]
pub struct SeedResult {
    pub inserted: usize,
}

#[derive(Debug)]
pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}

struct DemoRow {
    product_id: i64,
    name: &'static str,
    category: &'static str,
    quantity_in_stock: i64,
    unit_price: f64,
}

impl DemoRow {
    fn to_item(&self) -> InventoryItem {
        InventoryItem {
            product_id: self.product_id,
            name: self.name.to_string(),
            category: self.category.to_string(),
            quantity_in_stock: self.quantity_in_stock,
            unit_price: self.unit_price,
        }
    }
}

/// Canonical demo inventory loaded by `stocky seed` and the end-to-end tests.
const DEMO_ROWS: &[DemoRow] = &[
    DemoRow {
        product_id: 1,
        name: "Laptop Computer",
        category: "Electronics",
        quantity_in_stock: 5,
        unit_price: 1299.99,
    },
    DemoRow {
        product_id: 2,
        name: "USB Cable",
        category: "Accessories",
        quantity_in_stock: 150,
        unit_price: 9.99,
    },
    DemoRow {
        product_id: 3,
        name: "Wireless Mouse",
        category: "Electronics",
        quantity_in_stock: 32,
        unit_price: 24.99,
    },
    DemoRow {
        product_id: 4,
        name: "Mechanical Keyboard",
        category: "Electronics",
        quantity_in_stock: 18,
        unit_price: 89.99,
    },
    DemoRow {
        product_id: 5,
        name: "Monitor Stand",
        category: "Accessories",
        quantity_in_stock: 25,
        unit_price: 39.99,
    },
    DemoRow {
        product_id: 6,
        name: "Power Adapter",
        category: "Electronics",
        quantity_in_stock: 45,
        unit_price: 49.99,
    },
    DemoRow {
        product_id: 7,
        name: "HDMI Cable",
        category: "Accessories",
        quantity_in_stock: 200,
        unit_price: 12.99,
    },
    DemoRow {
        product_id: 8,
        name: "Desk Lamp",
        category: "Office Supplies",
        quantity_in_stock: 12,
        unit_price: 34.99,
    },
    DemoRow {
        product_id: 9,
        name: "Phone Case",
        category: "Accessories",
        quantity_in_stock: 85,
        unit_price: 14.99,
    },
    DemoRow {
        product_id: 10,
        name: "Screen Protector",
        category: "Accessories",
        quantity_in_stock: 120,
        unit_price: 8.99,
    },
];

pub struct DemoInventoryDataset;

impl DemoInventoryDataset {
    /// Insert the demo rows. Idempotent: reloading replaces by primary key.
    pub async fn load(pool: &DbPool) -> Result<SeedResult, SeedError> {
        for row in DEMO_ROWS {
            let item = row.to_item();
            item.validate()?;

            sqlx::query(
                "INSERT OR REPLACE INTO inventory
                 (product_id, name, category, quantity_in_stock, unit_price)
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(item.product_id)
            .bind(&item.name)
            .bind(&item.category)
            .bind(item.quantity_in_stock)
            .bind(item.unit_price)
            .execute(pool)
            .await?;
        }

        Ok(SeedResult { inserted: DEMO_ROWS.len() })
    }

    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, SeedError> {
        let row_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM inventory").fetch_one(pool).await?;

        let laptop_stock = stock_for(pool, "Laptop Computer").await?;
        let keyboard_stock = stock_for(pool, "Mechanical Keyboard").await?;
        let desk_lamp_stock = stock_for(pool, "Desk Lamp").await?;

        let below_twenty: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM inventory WHERE quantity_in_stock < 20",
        )
        .fetch_one(pool)
        .await?;

        let checks = vec![
            ("ten_rows_present", row_count == DEMO_ROWS.len() as i64),
            ("laptop_stock_is_five", laptop_stock == Some(5)),
            ("keyboard_stock_is_eighteen", keyboard_stock == Some(18)),
            ("desk_lamp_stock_is_twelve", desk_lamp_stock == Some(12)),
            ("three_products_below_twenty_units", below_twenty == 3),
        ];

        let all_present = checks.iter().all(|(_, passed)| *passed);
        Ok(VerificationResult { all_present, checks })
    }
}

async fn stock_for(pool: &DbPool, name: &str) -> Result<Option<i64>, SeedError> {
    Ok(sqlx::query_scalar("SELECT quantity_in_stock FROM inventory WHERE name = ?")
        .bind(name)
        .fetch_optional(pool)
        .await?)
}

#[cfg(test)]
mod tests {
    use super::DemoInventoryDataset;
    use crate::{connect_with_settings, migrations};

    #[tokio::test]
    async fn load_then_verify_passes_all_checks() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("run migrations");

        let seeded = DemoInventoryDataset::load(&pool).await.expect("seed demo rows");
        assert_eq!(seeded.inserted, 10);

        let verification = DemoInventoryDataset::verify(&pool).await.expect("verify seed");
        assert!(
            verification.all_present,
            "all seed checks should pass: {:?}",
            verification.checks
        );
    }

    #[tokio::test]
    async fn load_is_idempotent() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("run migrations");

        DemoInventoryDataset::load(&pool).await.expect("first seed");
        DemoInventoryDataset::load(&pool).await.expect("second seed");

        let row_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inventory")
            .fetch_one(&pool)
            .await
            .expect("count rows");
        assert_eq!(row_count, 10, "reseeding should not duplicate rows");
    }
}
