use anyhow::Result;
use async_trait::async_trait;

use stocky_db::InventoryRepository;

use super::Tool;

/// Case-insensitive product-name lookup. Pure, read-only, deterministic:
/// one parameterized `lower(name) = lower(?)` query per invocation.
pub struct CaseInsensitiveInventoryQueryTool {
    repository: Box<dyn InventoryRepository>,
}

impl CaseInsensitiveInventoryQueryTool {
    pub fn new<R>(repository: R) -> Self
    where
        R: InventoryRepository + 'static,
    {
        Self { repository: Box::new(repository) }
    }
}

#[async_trait]
impl Tool for CaseInsensitiveInventoryQueryTool {
    fn name(&self) -> &'static str {
        "case_insensitive_inventory_query"
    }

    fn description(&self) -> &'static str {
        "Query inventory table for product names using case-insensitive matching."
    }

    async fn invoke(&self, input: &str) -> Result<String> {
        let matches = self.repository.find_by_name_case_insensitive(input.trim()).await?;
        let rendered =
            matches.iter().map(|item| item.render_tuple()).collect::<Vec<_>>().join(", ");
        Ok(format!("[{rendered}]"))
    }
}
