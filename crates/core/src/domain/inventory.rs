use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// One row of the `inventory` table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub product_id: i64,
    pub name: String,
    pub category: String,
    pub quantity_in_stock: i64,
    pub unit_price: f64,
}

impl InventoryItem {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvariantViolation(format!(
                "inventory item {} has an empty name",
                self.product_id
            )));
        }
        if self.category.trim().is_empty() {
            return Err(DomainError::InvariantViolation(format!(
                "inventory item {} has an empty category",
                self.product_id
            )));
        }
        if self.quantity_in_stock < 0 {
            return Err(DomainError::InvariantViolation(format!(
                "inventory item {} has negative stock ({})",
                self.product_id, self.quantity_in_stock
            )));
        }
        if self.unit_price < 0.0 || !self.unit_price.is_finite() {
            return Err(DomainError::InvariantViolation(format!(
                "inventory item {} has an invalid unit price ({})",
                self.product_id, self.unit_price
            )));
        }
        Ok(())
    }

    /// Tuple rendering used when a row is fed back to the model as an
    /// observation, e.g. `(1, 'Laptop Computer', 'Electronics', 5, 1299.99)`.
    pub fn render_tuple(&self) -> String {
        format!(
            "({}, '{}', '{}', {}, {})",
            self.product_id,
            escape_single_quotes(&self.name),
            escape_single_quotes(&self.category),
            self.quantity_in_stock,
            self.unit_price
        )
    }
}

fn escape_single_quotes(value: &str) -> String {
    value.replace('\'', "\\'")
}
