//! NPC catalog loader.
//!
//! Loads NPC templates from RON files and validates them by building their
//! combat registries once at load time.

use std::collections::BTreeMap;
use std::path::Path;

use mud_core::{NpcOracle, NpcTemplate};

use crate::loaders::{LoadResult, read_file};

/// NPC templates keyed by definition id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NpcCatalog {
    templates: BTreeMap<String, NpcTemplate>,
}

impl NpcCatalog {
    pub fn get(&self, key: &str) -> Option<&NpcTemplate> {
        self.templates.get(key)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl NpcOracle for NpcCatalog {
    fn template(&self, key: &str) -> Option<NpcTemplate> {
        self.templates.get(key).cloned()
    }

    fn keys(&self) -> Vec<String> {
        self.templates.keys().cloned().collect()
    }
}

/// Loader for NPC catalogs from RON files.
pub struct NpcLoader;

impl NpcLoader {
    /// Load an NPC catalog from a RON file.
    ///
    /// RON format: `Vec<(String, NpcTemplate)>`
    ///
    /// Duplicate keys and templates with malformed attack or hit-location
    /// descriptors are rejected.
    pub fn load(path: &Path) -> LoadResult<NpcCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse a catalog from RON text.
    pub fn parse(content: &str) -> LoadResult<NpcCatalog> {
        let raw: Vec<(String, NpcTemplate)> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse NPC catalog RON: {}", e))?;

        let mut templates = BTreeMap::new();
        for (key, template) in raw {
            template
                .registry()
                .map_err(|e| anyhow::anyhow!("Invalid NPC '{}': {}", key, e))?;
            if templates.insert(key.clone(), template).is_some() {
                anyhow::bail!("Duplicate NPC definition '{}'", key);
            }
        }

        Ok(NpcCatalog { templates })
    }
}
