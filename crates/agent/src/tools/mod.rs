use std::collections::BTreeMap;

use anyhow::Result;
use async_trait::async_trait;

use stocky_db::{DbPool, SqlInventoryRepository};

pub mod lookup;
pub mod sql;

pub use lookup::CaseInsensitiveInventoryQueryTool;
pub use sql::{ListTablesTool, SqlQueryTool, TableSchemaTool};

/// A named capability the loop can dispatch to. The loop treats tools
/// uniformly and never inspects the implementation behind `invoke`.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    async fn invoke(&self, input: &str) -> Result<String>;
}

/// Name -> tool dispatch table. Built once at startup, read-only afterwards.
/// A BTreeMap keeps the catalogue ordering (and therefore the prompt)
/// deterministic.
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn register<T>(&mut self, tool: T)
    where
        T: Tool + 'static,
    {
        self.tools.insert(tool.name().to_string(), Box::new(tool));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|tool| tool.as_ref())
    }

    pub fn catalogue(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.tools.values().map(|tool| (tool.name(), tool.description()))
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.tools.values().map(|tool| tool.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// The full inventory tool set wired to one connection pool.
    pub fn with_default_tools(pool: DbPool) -> Self {
        let mut registry = Self::default();
        registry.register(SqlQueryTool::new(pool.clone()));
        registry.register(ListTablesTool::new(pool.clone()));
        registry.register(TableSchemaTool::new(pool.clone()));
        registry
            .register(CaseInsensitiveInventoryQueryTool::new(SqlInventoryRepository::new(pool)));
        registry
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use async_trait::async_trait;

    use super::{Tool, ToolRegistry};

    struct NamedTool(&'static str);

    #[async_trait]
    impl Tool for NamedTool {
        fn name(&self) -> &'static str {
            self.0
        }

        fn description(&self) -> &'static str {
            "a test tool"
        }

        async fn invoke(&self, input: &str) -> Result<String> {
            Ok(input.to_string())
        }
    }

    #[test]
    fn lookup_finds_registered_tools_by_name() {
        let mut registry = ToolRegistry::default();
        registry.register(NamedTool("alpha"));
        registry.register(NamedTool("beta"));

        assert!(registry.get("alpha").is_some());
        assert!(registry.get("gamma").is_none());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn catalogue_is_sorted_by_name() {
        let mut registry = ToolRegistry::default();
        registry.register(NamedTool("zeta"));
        registry.register(NamedTool("alpha"));
        registry.register(NamedTool("mid"));

        assert_eq!(registry.names(), vec!["alpha", "mid", "zeta"]);
    }
}
