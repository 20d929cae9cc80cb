//! Name-service implementations.

use std::collections::HashMap;

use async_trait::async_trait;

use cloak_core::error::Result;
use cloak_core::traits::NameService;
use cloak_core::types::EthAddress;

/// A fixed name → address table.
///
/// Backs tests and local development; production deployments plug real
/// ENS/CNS clients in behind the same trait.
#[derive(Debug, Default)]
pub struct StaticNameService {
    suffixes: Vec<String>,
    entries: HashMap<String, EthAddress>,
}

impl StaticNameService {
    /// Creates a service answering for the given name suffixes
    /// (e.g. `[".eth"]`).
    pub fn new(suffixes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            suffixes: suffixes.into_iter().map(Into::into).collect(),
            entries: HashMap::new(),
        }
    }

    /// Adds a name → address entry.
    pub fn with_entry(mut self, name: impl Into<String>, address: EthAddress) -> Self {
        self.entries.insert(name.into().to_lowercase(), address);
        self
    }
}

#[async_trait]
impl NameService for StaticNameService {
    fn supports(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.suffixes.iter().any(|suffix| name.ends_with(suffix))
    }

    async fn resolve_address(&self, name: &str) -> Result<Option<EthAddress>> {
        Ok(self.entries.get(&name.to_lowercase()).copied())
    }
}
