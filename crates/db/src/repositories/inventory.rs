use sqlx::Row;

use stocky_core::InventoryItem;

use super::{InventoryRepository, RepositoryError};
use crate::DbPool;

pub struct SqlInventoryRepository {
    pool: DbPool,
}

impl SqlInventoryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl InventoryRepository for SqlInventoryRepository {
    async fn find_by_name_case_insensitive(
        &self,
        name: &str,
    ) -> Result<Vec<InventoryItem>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT product_id, name, category, quantity_in_stock, unit_price
             FROM inventory
             WHERE lower(name) = lower(?)
             ORDER BY product_id",
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(InventoryItem {
                    product_id: row
                        .try_get("product_id")
                        .map_err(|err| RepositoryError::Decode(err.to_string()))?,
                    name: row
                        .try_get("name")
                        .map_err(|err| RepositoryError::Decode(err.to_string()))?,
                    category: row
                        .try_get("category")
                        .map_err(|err| RepositoryError::Decode(err.to_string()))?,
                    quantity_in_stock: row
                        .try_get("quantity_in_stock")
                        .map_err(|err| RepositoryError::Decode(err.to_string()))?,
                    unit_price: row
                        .try_get("unit_price")
                        .map_err(|err| RepositoryError::Decode(err.to_string()))?,
                })
            })
            .collect()
    }
}
