pub mod connection;
pub mod fixtures;
pub mod migrations;
pub mod rendering;
pub mod repositories;

pub use connection::{connect, connect_with_settings, DbPool};
pub use fixtures::{DemoInventoryDataset, SeedError, SeedResult, VerificationResult};
pub use repositories::{InventoryRepository, RepositoryError, SqlInventoryRepository};
