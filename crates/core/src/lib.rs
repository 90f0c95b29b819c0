pub mod config;
pub mod domain;
pub mod errors;

pub use domain::inventory::InventoryItem;
pub use errors::DomainError;
