use async_trait::async_trait;
use thiserror::Error;

use stocky_core::InventoryItem;

pub mod inventory;

pub use inventory::SqlInventoryRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

#[async_trait]
pub trait InventoryRepository: Send + Sync {
    /// All rows whose `name` matches the given value ignoring ASCII case.
    async fn find_by_name_case_insensitive(
        &self,
        name: &str,
    ) -> Result<Vec<InventoryItem>, RepositoryError>;
}
